use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::DeliveryError;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn post_text(&self, url: &str, text: &str) -> Result<(), DeliveryError>;
}

/// Slack-style incoming webhook: `POST {"text": ...}`.
#[derive(Clone)]
pub struct HttpWebhook {
    client: Client,
}

impl HttpWebhook {
    pub fn new(timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookSender for HttpWebhook {
    async fn post_text(&self, url: &str, text: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url)
            .json(&WebhookPayload { text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DeliveryError::WebhookStatus(response.status()));
        }
        Ok(())
    }
}
