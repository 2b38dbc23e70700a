/// Why a channel failed to deliver. Never leaves the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Webhook(#[from] reqwest::Error),
    #[error("webhook answered with status {0}")]
    WebhookStatus(reqwest::StatusCode),
    #[error("smtp delivery failed: {0}")]
    Smtp(#[from] mail_send::Error),
}
