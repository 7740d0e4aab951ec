//! Outbound notification delivery
use async_trait::async_trait;
use serde::Serialize;

use crate::error::NotifierError;
use crate::models::HolidayEvent;

/// JSON body accepted by Discord webhooks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub content: String,
}

impl WebhookMessage {
    /// Announcement with the start as a Discord long-date token (`<t:N:D>`)
    pub fn for_holiday(holiday: &HolidayEvent) -> Self {
        Self {
            content: format!(
                "🎉 Upcoming Holiday: **{}** on <t:{}:D>",
                holiday.name,
                holiday.start.timestamp()
            ),
        }
    }
}

/// Delivers a message to the chat channel
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn send(&self, message: &WebhookMessage) -> Result<(), NotifierError>;
}

/// Posts messages to a webhook URL
pub struct HttpWebhook {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl HttpWebhook {
    pub fn new(client: reqwest::Client, url: reqwest::Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl WebhookSender for HttpWebhook {
    async fn send(&self, message: &WebhookMessage) -> Result<(), NotifierError> {
        self.client
            .post(self.url.clone())
            .json(message)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            // The webhook URL embeds its token, keep it out of logs
            .map_err(|e| NotifierError::Delivery(e.without_url().to_string()))?;
        Ok(())
    }
}
