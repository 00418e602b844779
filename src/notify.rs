//! Webhook delivery.

use calwatch_core::{CalWatchError, CalWatchResult};
use serde::Serialize;

/// A rendered message, ready for the webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Delivers rendered messages. Failures are reported to the caller, never
/// retried.
pub trait Notifier {
    async fn deliver(&self, message: &OutboundMessage) -> CalWatchResult<()>;
}

/// Discord-compatible webhook endpoint.
pub struct DiscordWebhook {
    client: reqwest::Client,
    webhook_url: String,
}

impl DiscordWebhook {
    pub fn new(webhook_url: String) -> DiscordWebhook {
        DiscordWebhook {
            client: reqwest::Client::new(),
            webhook_url,
        }
    }
}

impl Notifier for DiscordWebhook {
    // Body shape: {"content": "...", "username": "...", "embeds": [...]}.
    async fn deliver(&self, message: &OutboundMessage) -> CalWatchResult<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await
            .map_err(|e| CalWatchError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CalWatchError::Delivery(format!(
                "webhook returned {status}: {body}"
            )));
        }

        Ok(())
    }
}
