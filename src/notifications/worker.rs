use sea_orm::DatabaseConnection;
use tokio::{sync::mpsc::Receiver, task::JoinHandle};

use crate::{db::entities::employee, error::AppError, services::ServiceContext};

use super::{
    dispatcher::{DispatchContext, DispatchReport, NotificationDispatcher},
    queue::{Notification, PayrollAlert},
    template::RelatedLookups,
};

/// Drains the notification queue, loading a fresh settings snapshot for
/// every notification.
pub struct NotificationWorker {
    rx: Receiver<Notification>,
    services: ServiceContext,
    dispatcher: NotificationDispatcher,
}

impl NotificationWorker {
    pub fn new(
        rx: Receiver<Notification>,
        db: &DatabaseConnection,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            rx,
            services: ServiceContext::new(db),
            dispatcher,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        while let Some(notification) = self.rx.recv().await {
            self.handle(notification).await;
        }
        tracing::info!("notification worker stopped");
    }

    pub(crate) async fn handle(&self, notification: Notification) -> Option<DispatchReport> {
        match notification {
            Notification::Transition(event) => match self.load_context(&event.employee).await {
                Ok(ctx) => Some(self.dispatcher.on_transition(&event, &ctx).await),
                Err(err) => {
                    tracing::warn!(
                        event = %event.kind,
                        employee_id = %event.employee.id,
                        error = %err,
                        "could not load notification context"
                    );
                    None
                }
            },
            Notification::PayrollAlert(alert) => {
                self.send_alert(&alert).await;
                None
            }
        }
    }

    async fn send_alert(&self, alert: &PayrollAlert) {
        match self.services.settings().snapshot().await {
            Ok(settings) => {
                self.dispatcher.send_alert(&settings, &alert.text()).await;
            }
            Err(err) => {
                tracing::warn!(
                    username = %alert.username,
                    error = %err,
                    "could not load settings for alert"
                );
            }
        }
    }

    async fn load_context(&self, employee: &employee::Model) -> Result<DispatchContext, AppError> {
        let settings = self.services.settings();
        let names = self
            .services
            .references()
            .names_by_id(&RelatedLookups::ids_for(employee))
            .await?;

        Ok(DispatchContext {
            settings: settings.snapshot().await?,
            templates: settings.mail_templates().await?,
            lookups: RelatedLookups::resolve(employee, &names),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::NotificationWorker;
    use crate::{
        lifecycle::{TransitionEvent, TransitionKind},
        notifications::{
            NotificationDispatcher, NotificationQueue,
            dispatcher::tests::{RecordingMailer, RecordingWebhook},
            queue::{Notification, PayrollAlert, PayrollGrant},
            template::tests::employee_fixture,
        },
        services::{ServiceContext, settings_service::TriggerUpdate},
        test_helpers::memory_db,
    };

    #[tokio::test]
    async fn transition_uses_the_saved_settings() {
        let db = memory_db().await;
        let settings = ServiceContext::new(&db).settings();
        settings
            .save_webhook("admin", Some("https://hooks.example/x".to_string()))
            .await
            .expect("webhook should save");
        settings
            .save_triggers(
                "admin",
                TriggerUpdate {
                    notify_updated: true,
                    ..TriggerUpdate::default()
                },
            )
            .await
            .expect("triggers should save");

        let webhook = Arc::new(RecordingWebhook::default());
        let mailer = Arc::new(RecordingMailer::default());
        let (_queue, rx) = NotificationQueue::new(4);
        let worker = NotificationWorker::new(
            rx,
            &db,
            NotificationDispatcher::new(webhook.clone(), mailer.clone()),
        );

        let report = worker
            .handle(Notification::Transition(TransitionEvent {
                kind: TransitionKind::Updated,
                employee: employee_fixture(),
                actor: "admin".to_string(),
            }))
            .await
            .expect("context should load");

        assert!(report.webhook.is_delivered());
        assert_eq!(
            webhook.texts(),
            vec!["Employee updated: Ana Silva (ana@co.com)".to_string()]
        );
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn payroll_alert_needs_only_a_webhook_url() {
        let db = memory_db().await;
        ServiceContext::new(&db)
            .settings()
            .save_webhook("admin", Some("https://hooks.example/x".to_string()))
            .await
            .expect("webhook should save");

        let webhook = Arc::new(RecordingWebhook::default());
        let (_queue, rx) = NotificationQueue::new(4);
        let worker = NotificationWorker::new(
            rx,
            &db,
            NotificationDispatcher::new(webhook.clone(), Arc::new(RecordingMailer::default())),
        );

        worker
            .handle(Notification::PayrollAlert(PayrollAlert {
                username: "paula".to_string(),
                actor: "admin".to_string(),
                grant: PayrollGrant::Created,
            }))
            .await;

        assert_eq!(
            webhook.texts(),
            vec!["<!channel> User paula has been created by admin with Payroll Access".to_string()]
        );
    }
}
