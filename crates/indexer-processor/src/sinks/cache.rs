use super::traits::{EventSink, SinkEvent};
use async_trait::async_trait;
use indexer_core::{IndexerError, Result};
use indexer_redis::{BotStateCache, BotStateMessage};
use tracing::debug;

/// Refreshes the cached `bot:<tokenId>` entry whenever a bot changes
pub struct CacheSink {
    cache: BotStateCache,
}

impl CacheSink {
    pub fn new(cache: BotStateCache) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl EventSink for CacheSink {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn handle_event(&self, event: SinkEvent) -> Result<()> {
        let Some(bot) = event.bot() else {
            return Ok(());
        };

        let state = BotStateMessage::from(bot);
        self.cache
            .cache_bot_state(&bot.id, &state, None)
            .await
            .map_err(|e| IndexerError::Sink(format!("cache: {}", e)))?;
        indexer_metrics::counters::cache_writes(1);

        debug!(bot = %bot.id, event = event.kind(), "Bot state cached");
        Ok(())
    }
}
