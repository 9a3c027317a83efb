use anyhow::{Context, Result};

pub mod card;
pub mod teams;

use card::Message;
use teams::TeamsWebhook;

pub trait Notifier {
    async fn deliver(&self, message: &Message) -> Result<()>;
}

/// Where the rendered card goes.
pub enum Delivery {
    Webhook(TeamsWebhook),
    /// `--dry-run`: pretty-print the card on stdout.
    Stdout,
}

impl Notifier for Delivery {
    async fn deliver(&self, message: &Message) -> Result<()> {
        match self {
            Delivery::Webhook(webhook) => webhook.post(message).await,
            Delivery::Stdout => {
                let json = serde_json::to_string_pretty(message)
                    .context("failed to serialize reminder card")?;
                println!("{json}");
                Ok(())
            }
        }
    }
}
