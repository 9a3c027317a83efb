use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use super::card::Message;

/// Teams incoming webhook. The response status is logged, never retried.
pub struct TeamsWebhook {
    client: Client,
    url: String,
}

impl TeamsWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub async fn post(&self, message: &Message) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .context("failed to post reminder card to webhook")?;

        let status = response.status();
        if status.is_success() {
            info!(%status, "reminder card delivered");
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "webhook answered with a non-success status");
        }
        Ok(())
    }
}
