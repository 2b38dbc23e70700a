use std::time::Duration;

use async_trait::async_trait;
use mail_builder::MessageBuilder;
use mail_send::SmtpClientBuilder;

use super::{DeliveryError, settings::SmtpSettings};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, smtp: &SmtpSettings, mail: OutgoingMail) -> Result<(), DeliveryError>;
}

/// One SMTP session per message, upgraded with STARTTLS.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    timeout: Duration,
}

impl SmtpMailer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl MailSender for SmtpMailer {
    #[tracing::instrument(skip_all, fields(host = %smtp.host, recipients = mail.to.len()))]
    async fn send(&self, smtp: &SmtpSettings, mail: OutgoingMail) -> Result<(), DeliveryError> {
        let message = MessageBuilder::new()
            .from(smtp.username.as_str())
            .to(mail.to.iter().map(String::as_str).collect::<Vec<_>>())
            .subject(mail.subject.as_str())
            .text_body(mail.body.as_str());

        SmtpClientBuilder::new(smtp.host.as_str(), smtp.port)
            .implicit_tls(false)
            .credentials((smtp.username.as_str(), smtp.password.as_str()))
            .timeout(self.timeout)
            .connect()
            .await?
            .send(message)
            .await?;
        Ok(())
    }
}
