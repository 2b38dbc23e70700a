use std::{collections::HashMap, sync::Arc};

use crate::{
    db::entities::{email_template::TemplateKind, employee},
    lifecycle::{TransitionEvent, TransitionKind},
};

use super::{
    DeliveryError,
    mailer::{MailSender, OutgoingMail},
    settings::SettingsSnapshot,
    template::{RelatedLookups, render},
    webhook::WebhookSender,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailTemplate {
    pub subject: String,
    pub body: String,
}

/// Everything a dispatch reads, captured once per event.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    pub settings: SettingsSnapshot,
    pub templates: HashMap<TemplateKind, MailTemplate>,
    pub lookups: RelatedLookups,
}

#[derive(Debug)]
pub enum ChannelOutcome {
    Delivered,
    Skipped(&'static str),
    Failed(DeliveryError),
}

impl ChannelOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, ChannelOutcome::Delivered)
    }
}

#[derive(Debug)]
pub struct DispatchReport {
    pub webhook: ChannelOutcome,
    pub email: ChannelOutcome,
    pub welcome: ChannelOutcome,
}

pub fn template_for(kind: TransitionKind) -> TemplateKind {
    match kind {
        TransitionKind::Onboarded | TransitionKind::Reboarded => TemplateKind::Onboarding,
        TransitionKind::Updated => TemplateKind::Update,
        TransitionKind::Offboarded => TemplateKind::Offboarding,
    }
}

pub fn summary_line(kind: TransitionKind, employee: &employee::Model) -> String {
    let prefix = match kind {
        TransitionKind::Onboarded => "New employee added",
        TransitionKind::Updated => "Employee updated",
        TransitionKind::Offboarded => "Employee offboarded",
        TransitionKind::Reboarded => "Employee re-onboarded",
    };
    format!("{prefix}: {} ({})", employee.full_name, employee.email)
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    webhook: Arc<dyn WebhookSender>,
    mailer: Arc<dyn MailSender>,
}

impl NotificationDispatcher {
    pub fn new(webhook: Arc<dyn WebhookSender>, mailer: Arc<dyn MailSender>) -> Self {
        Self { webhook, mailer }
    }

    /// Runs both channels plus the welcome mail. Failures end up in the
    /// report, never in a `Result`.
    pub async fn on_transition(
        &self,
        event: &TransitionEvent,
        ctx: &DispatchContext,
    ) -> DispatchReport {
        let enabled = ctx.settings.triggers.enabled(event.kind);

        let webhook = if enabled {
            self.deliver_webhook(&ctx.settings, &summary_line(event.kind, &event.employee))
                .await
        } else {
            ChannelOutcome::Skipped("trigger disabled")
        };

        let email = if enabled {
            let recipients = ctx
                .settings
                .smtp
                .as_ref()
                .map(|smtp| smtp.recipients.clone())
                .unwrap_or_default();
            self.deliver_email(ctx, template_for(event.kind), &event.employee, recipients)
                .await
        } else {
            ChannelOutcome::Skipped("trigger disabled")
        };

        let welcome = if event.kind == TransitionKind::Onboarded
            && ctx.settings.triggers.welcome_enabled()
        {
            let personal = event
                .employee
                .personal_email
                .iter()
                .map(|address| address.trim())
                .filter(|address| !address.is_empty())
                .map(str::to_string)
                .collect();
            self.deliver_email(ctx, TemplateKind::Welcome, &event.employee, personal)
                .await
        } else {
            ChannelOutcome::Skipped("welcome disabled")
        };

        let report = DispatchReport {
            webhook,
            email,
            welcome,
        };
        log_report(event, &report);
        report
    }

    /// Webhook-only message that ignores trigger flags.
    pub async fn send_alert(&self, settings: &SettingsSnapshot, text: &str) -> ChannelOutcome {
        let outcome = self.deliver_webhook(settings, text).await;
        if let ChannelOutcome::Failed(err) = &outcome {
            tracing::warn!(channel = "webhook", error = %err, "alert delivery failed");
        }
        outcome
    }

    async fn deliver_webhook(&self, settings: &SettingsSnapshot, text: &str) -> ChannelOutcome {
        let Some(url) = settings.webhook_url.as_deref() else {
            return ChannelOutcome::Skipped("no webhook url");
        };

        match self.webhook.post_text(url, text).await {
            Ok(()) => ChannelOutcome::Delivered,
            Err(err) => ChannelOutcome::Failed(err),
        }
    }

    async fn deliver_email(
        &self,
        ctx: &DispatchContext,
        kind: TemplateKind,
        employee: &employee::Model,
        to: Vec<String>,
    ) -> ChannelOutcome {
        let Some(smtp) = ctx.settings.smtp.as_ref() else {
            return ChannelOutcome::Skipped("smtp not configured");
        };
        if to.is_empty() {
            return ChannelOutcome::Skipped("no recipients");
        }
        let Some(template) = ctx.templates.get(&kind) else {
            return ChannelOutcome::Skipped("no template");
        };

        let mail = OutgoingMail {
            to,
            subject: render(&template.subject, employee, &ctx.lookups),
            body: render(&template.body, employee, &ctx.lookups),
        };

        match self.mailer.send(smtp, mail).await {
            Ok(()) => ChannelOutcome::Delivered,
            Err(err) => ChannelOutcome::Failed(err),
        }
    }
}

fn log_report(event: &TransitionEvent, report: &DispatchReport) {
    for (channel, outcome) in [
        ("webhook", &report.webhook),
        ("email", &report.email),
        ("welcome", &report.welcome),
    ] {
        match outcome {
            ChannelOutcome::Delivered => tracing::info!(
                event = %event.kind,
                channel,
                employee_id = %event.employee.id,
                "notification delivered"
            ),
            ChannelOutcome::Skipped(reason) => tracing::debug!(
                event = %event.kind,
                channel,
                reason,
                "notification skipped"
            ),
            ChannelOutcome::Failed(err) => tracing::warn!(
                event = %event.kind,
                channel,
                employee_id = %event.employee.id,
                error = %err,
                "notification delivery failed"
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{collections::HashMap, sync::Arc, sync::Mutex};

    use async_trait::async_trait;

    use super::{ChannelOutcome, DispatchContext, MailTemplate, NotificationDispatcher};
    use crate::{
        db::entities::email_template::TemplateKind,
        lifecycle::{TransitionEvent, TransitionKind},
        notifications::{
            DeliveryError,
            mailer::{MailSender, OutgoingMail},
            settings::{SettingsSnapshot, SmtpSettings, TriggerFlags},
            template::tests::employee_fixture,
            webhook::WebhookSender,
        },
    };

    #[derive(Default)]
    pub(crate) struct RecordingWebhook {
        pub calls: Mutex<Vec<(String, String)>>,
        pub fail: bool,
    }

    impl RecordingWebhook {
        pub fn texts(&self) -> Vec<String> {
            self.calls
                .lock()
                .map(|calls| calls.iter().map(|(_, text)| text.clone()).collect())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl WebhookSender for RecordingWebhook {
        async fn post_text(&self, url: &str, text: &str) -> Result<(), DeliveryError> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((url.to_string(), text.to_string()));
            }
            if self.fail {
                return Err(DeliveryError::WebhookStatus(
                    reqwest::StatusCode::SERVICE_UNAVAILABLE,
                ));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingMail>>,
    }

    impl RecordingMailer {
        pub fn sent(&self) -> Vec<OutgoingMail> {
            self.sent
                .lock()
                .map(|sent| sent.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl MailSender for RecordingMailer {
        async fn send(&self, _smtp: &SmtpSettings, mail: OutgoingMail) -> Result<(), DeliveryError> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(mail);
            }
            Ok(())
        }
    }

    fn smtp() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.co.com".to_string(),
            port: 587,
            username: "hr@co.com".to_string(),
            password: "secret".to_string(),
            recipients: vec!["it@co.com".to_string()],
        }
    }

    fn context(triggers: TriggerFlags) -> DispatchContext {
        DispatchContext {
            settings: SettingsSnapshot {
                version: 1,
                triggers,
                webhook_url: Some("https://hooks.example/abc".to_string()),
                smtp: Some(smtp()),
            },
            templates: HashMap::from([
                (
                    TemplateKind::Onboarding,
                    MailTemplate {
                        subject: "Welcome aboard {full_name}".to_string(),
                        body: "{first_name} starts {start_date}".to_string(),
                    },
                ),
                (
                    TemplateKind::Welcome,
                    MailTemplate {
                        subject: "Hello {first_name}".to_string(),
                        body: "See you on {start_date}".to_string(),
                    },
                ),
            ]),
            lookups: Default::default(),
        }
    }

    fn event(kind: TransitionKind) -> TransitionEvent {
        TransitionEvent {
            kind,
            employee: employee_fixture(),
            actor: "hr-user".to_string(),
        }
    }

    fn dispatcher(
        webhook: &Arc<RecordingWebhook>,
        mailer: &Arc<RecordingMailer>,
    ) -> NotificationDispatcher {
        NotificationDispatcher::new(webhook.clone(), mailer.clone())
    }

    #[tokio::test]
    async fn disabled_trigger_sends_nothing() {
        let webhook = Arc::new(RecordingWebhook::default());
        let mailer = Arc::new(RecordingMailer::default());

        let report = dispatcher(&webhook, &mailer)
            .on_transition(
                &event(TransitionKind::Onboarded),
                &context(TriggerFlags::default()),
            )
            .await;

        assert!(matches!(report.webhook, ChannelOutcome::Skipped(_)));
        assert!(webhook.texts().is_empty());
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn enabled_trigger_posts_one_summary_and_renders_mail() {
        let webhook = Arc::new(RecordingWebhook::default());
        let mailer = Arc::new(RecordingMailer::default());
        let triggers = TriggerFlags {
            onboarded: true,
            ..TriggerFlags::default()
        };

        let report = dispatcher(&webhook, &mailer)
            .on_transition(&event(TransitionKind::Onboarded), &context(triggers))
            .await;

        assert!(report.webhook.is_delivered());
        assert_eq!(
            webhook.texts(),
            vec!["New employee added: Ana Silva (ana@co.com)".to_string()]
        );
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["it@co.com".to_string()]);
        assert_eq!(sent[0].subject, "Welcome aboard Ana Silva");
        assert_eq!(sent[0].body, "Ana starts 15/01/2024");
        assert!(matches!(report.welcome, ChannelOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn welcome_mail_goes_to_personal_address() {
        let webhook = Arc::new(RecordingWebhook::default());
        let mailer = Arc::new(RecordingMailer::default());
        let triggers = TriggerFlags {
            onboarded: true,
            welcome_email: true,
            ..TriggerFlags::default()
        };

        let report = dispatcher(&webhook, &mailer)
            .on_transition(&event(TransitionKind::Onboarded), &context(triggers))
            .await;

        assert!(report.welcome.is_delivered());
        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].to, vec!["ana.silva@home.net".to_string()]);
        assert_eq!(sent[1].subject, "Hello Ana");
    }

    #[tokio::test]
    async fn reboarding_reuses_the_onboarding_template() {
        let webhook = Arc::new(RecordingWebhook::default());
        let mailer = Arc::new(RecordingMailer::default());
        let triggers = TriggerFlags {
            reboarded: true,
            welcome_email: true,
            ..TriggerFlags::default()
        };

        let report = dispatcher(&webhook, &mailer)
            .on_transition(&event(TransitionKind::Reboarded), &context(triggers))
            .await;

        assert_eq!(
            webhook.texts(),
            vec!["Employee re-onboarded: Ana Silva (ana@co.com)".to_string()]
        );
        assert_eq!(mailer.sent()[0].subject, "Welcome aboard Ana Silva");
        assert!(matches!(report.welcome, ChannelOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn webhook_failure_does_not_stop_email() {
        let webhook = Arc::new(RecordingWebhook {
            fail: true,
            ..RecordingWebhook::default()
        });
        let mailer = Arc::new(RecordingMailer::default());
        let triggers = TriggerFlags {
            onboarded: true,
            ..TriggerFlags::default()
        };

        let report = dispatcher(&webhook, &mailer)
            .on_transition(&event(TransitionKind::Onboarded), &context(triggers))
            .await;

        assert!(matches!(report.webhook, ChannelOutcome::Failed(_)));
        assert!(report.email.is_delivered());
    }

    #[tokio::test]
    async fn missing_template_skips_email_only() {
        let webhook = Arc::new(RecordingWebhook::default());
        let mailer = Arc::new(RecordingMailer::default());
        let triggers = TriggerFlags {
            offboarded: true,
            ..TriggerFlags::default()
        };

        let report = dispatcher(&webhook, &mailer)
            .on_transition(&event(TransitionKind::Offboarded), &context(triggers))
            .await;

        assert!(report.webhook.is_delivered());
        assert!(matches!(report.email, ChannelOutcome::Skipped("no template")));
    }

    #[tokio::test]
    async fn alert_ignores_trigger_flags() {
        let webhook = Arc::new(RecordingWebhook::default());
        let mailer = Arc::new(RecordingMailer::default());

        let outcome = dispatcher(&webhook, &mailer)
            .send_alert(&context(TriggerFlags::default()).settings, "<!channel> hi")
            .await;

        assert!(outcome.is_delivered());
        assert_eq!(webhook.texts(), vec!["<!channel> hi".to_string()]);
    }
}
