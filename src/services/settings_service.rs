use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{
        dao::{SettingsDao, TemplateDao},
        entities::{
            email_template::{self, TemplateKind},
            settings,
        },
    },
    error::AppError,
    notifications::{SettingsSnapshot, dispatcher::MailTemplate},
    services::audit_service::AuditService,
};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TriggerUpdate {
    pub notify_onboarded: bool,
    pub notify_updated: bool,
    pub notify_offboarded: bool,
    pub notify_reboarded: bool,
    pub send_welcome_email: bool,
}

/// A blank or missing `smtp_password` keeps the stored password.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailSettingsUpdate {
    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub email_recipients: Option<String>,
}

/// Settings as shown to administrators; the SMTP password never leaves the
/// server.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub version: i32,
    pub notify_onboarded: bool,
    pub notify_updated: bool,
    pub notify_offboarded: bool,
    pub notify_reboarded: bool,
    pub send_welcome_email: bool,
    pub webhook_url: Option<String>,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<i32>,
    pub smtp_username: Option<String>,
    pub smtp_password_set: bool,
    pub email_recipients: Option<String>,
    pub saved_by: Option<String>,
}

impl From<Option<settings::Model>> for SettingsView {
    fn from(row: Option<settings::Model>) -> Self {
        match row {
            Some(row) => Self {
                version: row.version,
                notify_onboarded: row.notify_onboarded,
                notify_updated: row.notify_updated,
                notify_offboarded: row.notify_offboarded,
                notify_reboarded: row.notify_reboarded,
                send_welcome_email: row.send_welcome_email,
                webhook_url: row.webhook_url,
                smtp_host: row.smtp_host,
                smtp_port: row.smtp_port,
                smtp_username: row.smtp_username,
                smtp_password_set: row.smtp_password.is_some_and(|value| !value.is_empty()),
                email_recipients: row.email_recipients,
                saved_by: Some(row.saved_by),
            },
            None => Self {
                version: 0,
                notify_onboarded: false,
                notify_updated: false,
                notify_offboarded: false,
                notify_reboarded: false,
                send_welcome_email: false,
                webhook_url: None,
                smtp_host: None,
                smtp_port: None,
                smtp_username: None,
                smtp_password_set: false,
                email_recipients: None,
                saved_by: None,
            },
        }
    }
}

#[derive(Clone)]
pub struct SettingsService {
    settings: SettingsDao,
    templates: TemplateDao,
    audit: AuditService,
}

impl SettingsService {
    pub fn new(settings: SettingsDao, templates: TemplateDao, audit: AuditService) -> Self {
        Self {
            settings,
            templates,
            audit,
        }
    }

    pub async fn view(&self) -> Result<SettingsView, AppError> {
        Ok(self.settings.current().await?.into())
    }

    pub async fn snapshot(&self) -> Result<SettingsSnapshot, AppError> {
        let current = self.settings.current().await?;
        Ok(SettingsSnapshot::from_row(current.as_ref()))
    }

    pub async fn save_triggers(
        &self,
        actor: &str,
        update: TriggerUpdate,
    ) -> Result<settings::Model, AppError> {
        self.revise(actor, "Trigger Points", move |row| {
            row.notify_onboarded = update.notify_onboarded;
            row.notify_updated = update.notify_updated;
            row.notify_offboarded = update.notify_offboarded;
            row.notify_reboarded = update.notify_reboarded;
            row.send_welcome_email = update.send_welcome_email;
        })
        .await
    }

    /// A blank URL clears the webhook.
    pub async fn save_webhook(
        &self,
        actor: &str,
        url: Option<String>,
    ) -> Result<settings::Model, AppError> {
        let url = trimmed(url);
        if let Some(url) = url.as_deref() {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(AppError::bad_request("Webhook URL must be http(s)"));
            }
        }

        self.revise(actor, "Webhook", move |row| row.webhook_url = url)
            .await
    }

    pub async fn save_email(
        &self,
        actor: &str,
        update: EmailSettingsUpdate,
    ) -> Result<settings::Model, AppError> {
        if let Some(port) = update.smtp_port {
            if !(1..=i32::from(u16::MAX)).contains(&port) {
                return Err(AppError::bad_request(format!("Invalid SMTP port {port}")));
            }
        }

        self.revise(actor, "Email Settings", move |row| {
            row.smtp_host = trimmed(update.smtp_host);
            row.smtp_port = update.smtp_port;
            row.smtp_username = trimmed(update.smtp_username);
            row.email_recipients = trimmed(update.email_recipients);
            if let Some(password) = update.smtp_password.filter(|value| !value.is_empty()) {
                row.smtp_password = Some(password);
            }
        })
        .await
    }

    pub async fn templates(&self) -> Result<Vec<email_template::Model>, AppError> {
        Ok(self.templates.list_templates().await?)
    }

    pub async fn mail_templates(&self) -> Result<HashMap<TemplateKind, MailTemplate>, AppError> {
        Ok(self
            .templates()
            .await?
            .into_iter()
            .map(|row| {
                (
                    row.kind,
                    MailTemplate {
                        subject: row.subject,
                        body: row.body,
                    },
                )
            })
            .collect())
    }

    pub async fn save_template(
        &self,
        actor: &str,
        kind: TemplateKind,
        subject: String,
        body: String,
    ) -> Result<email_template::Model, AppError> {
        if subject.trim().is_empty() {
            return Err(AppError::bad_request("Template subject is required"));
        }

        let saved = self.templates.upsert(kind, subject, body).await?;
        self.audit
            .info(
                "Email Template",
                actor,
                &format!("Saved {} template", kind.as_str()),
            )
            .await;
        Ok(saved)
    }

    /// Copies the live row, applies `edit`, and stores it as the next version.
    async fn revise<F>(
        &self,
        actor: &str,
        section: &str,
        edit: F,
    ) -> Result<settings::Model, AppError>
    where
        F: FnOnce(&mut settings::Model),
    {
        let current = self.settings.current().await?;
        let base_version = current.as_ref().map(|row| row.version).unwrap_or(0);
        let mut next = current.unwrap_or_else(|| blank_settings(actor));
        edit(&mut next);
        next.saved_by = actor.to_string();

        match self.settings.append_revision(base_version, next).await {
            Ok(saved) => {
                tracing::info!(version = saved.version, section, actor, "settings saved");
                self.audit
                    .info(
                        "Settings",
                        actor,
                        &format!("Saved {section} (version {})", saved.version),
                    )
                    .await;
                Ok(saved)
            }
            Err(err) if err.is_unique_violation() => Err(AppError::conflict(
                "Settings were changed concurrently; reload and try again",
            )),
            Err(err) => Err(err.into()),
        }
    }
}

fn blank_settings(actor: &str) -> settings::Model {
    let now = Utc::now().fixed_offset();
    settings::Model {
        id: Uuid::nil(),
        created_at: now,
        updated_at: now,
        version: 0,
        notify_onboarded: false,
        notify_updated: false,
        notify_offboarded: false,
        notify_reboarded: false,
        send_welcome_email: false,
        webhook_url: None,
        smtp_host: None,
        smtp_port: None,
        smtp_username: None,
        smtp_password: None,
        email_recipients: None,
        saved_by: actor.to_string(),
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{EmailSettingsUpdate, TriggerUpdate};
    use crate::{
        db::entities::email_template::TemplateKind, error::AppError, services::ServiceContext,
        test_helpers::memory_db,
    };

    #[tokio::test]
    async fn every_save_appends_a_new_version() {
        let db = memory_db().await;
        let settings = ServiceContext::new(&db).settings();

        let first = settings
            .save_triggers(
                "admin",
                TriggerUpdate {
                    notify_onboarded: true,
                    ..TriggerUpdate::default()
                },
            )
            .await
            .expect("first save should succeed");
        let second = settings
            .save_webhook("admin", Some(" https://hooks.example/a ".to_string()))
            .await
            .expect("second save should succeed");

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert!(second.notify_onboarded);
        assert_eq!(second.webhook_url.as_deref(), Some("https://hooks.example/a"));

        let snapshot = settings.snapshot().await.expect("snapshot should load");
        assert_eq!(snapshot.version, 2);
    }

    #[tokio::test]
    async fn blank_password_keeps_the_stored_one() {
        let db = memory_db().await;
        let settings = ServiceContext::new(&db).settings();
        let update = EmailSettingsUpdate {
            smtp_host: Some("smtp.co.com".to_string()),
            smtp_port: Some(587),
            smtp_username: Some("hr@co.com".to_string()),
            smtp_password: Some("first-secret".to_string()),
            email_recipients: Some("it@co.com".to_string()),
        };
        settings
            .save_email("admin", update.clone())
            .await
            .expect("save should succeed");

        let saved = settings
            .save_email(
                "admin",
                EmailSettingsUpdate {
                    smtp_password: Some(String::new()),
                    ..update
                },
            )
            .await
            .expect("save should succeed");
        assert_eq!(saved.smtp_password.as_deref(), Some("first-secret"));

        let view = settings.view().await.expect("view should load");
        assert!(view.smtp_password_set);
        let json = serde_json::to_value(&view).expect("view should serialize");
        assert!(json.get("smtp_password").is_none());
    }

    #[tokio::test]
    async fn blank_webhook_clears_and_bad_scheme_is_rejected() {
        let db = memory_db().await;
        let settings = ServiceContext::new(&db).settings();
        settings
            .save_webhook("admin", Some("https://hooks.example/a".to_string()))
            .await
            .expect("save should succeed");

        let cleared = settings
            .save_webhook("admin", Some("   ".to_string()))
            .await
            .expect("save should succeed");
        assert!(cleared.webhook_url.is_none());

        let err = settings
            .save_webhook("admin", Some("ftp://hooks.example".to_string()))
            .await
            .expect_err("scheme should be rejected");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn templates_are_replaced_per_kind() {
        let db = memory_db().await;
        let settings = ServiceContext::new(&db).settings();
        settings
            .save_template(
                "admin",
                TemplateKind::Welcome,
                "Hi".to_string(),
                "old".to_string(),
            )
            .await
            .expect("save should succeed");
        settings
            .save_template(
                "admin",
                TemplateKind::Welcome,
                "Hi {first_name}".to_string(),
                "new".to_string(),
            )
            .await
            .expect("save should succeed");

        let templates = settings.mail_templates().await.expect("load should succeed");
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[&TemplateKind::Welcome].subject, "Hi {first_name}");
    }
}
