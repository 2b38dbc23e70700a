pub mod dispatcher;
mod error;
pub mod mailer;
pub mod queue;
pub mod settings;
pub mod template;
pub mod webhook;
mod worker;

pub use dispatcher::{ChannelOutcome, DispatchContext, DispatchReport, NotificationDispatcher};
pub use error::DeliveryError;
pub use mailer::{MailSender, SmtpMailer};
pub use queue::{Notification, NotificationQueue, PayrollAlert, PayrollGrant};
pub use settings::SettingsSnapshot;
pub use webhook::{HttpWebhook, WebhookSender};
pub use worker::NotificationWorker;
