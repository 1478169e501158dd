use super::traits::{EventSink, SinkEvent};
use async_trait::async_trait;
use indexer_core::{IndexerError, Result};
use indexer_pinning::{BotMetadata, PinataClient};
use tracing::info;

/// Pins NFT metadata for newly deployed bots
pub struct PinningSink {
    client: PinataClient,
}

impl PinningSink {
    pub fn new(client: PinataClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventSink for PinningSink {
    fn name(&self) -> &'static str {
        "pinning"
    }

    async fn handle_event(&self, event: SinkEvent) -> Result<()> {
        let SinkEvent::BotDeployed { bot, .. } = event else {
            return Ok(());
        };

        let metadata = BotMetadata::from(&bot);
        let uri = self
            .client
            .update_bot_metadata(&bot.id, &metadata)
            .await
            .map_err(|e| IndexerError::Sink(format!("pinning: {}", e)))?;

        info!(bot = %bot.id, uri = %uri, "Bot metadata pinned");
        Ok(())
    }
}
