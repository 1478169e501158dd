use async_trait::async_trait;
use indexer_core::types::{Bot, Owner, Trade};
use indexer_core::Result;

/// Events that can be emitted to sinks
#[derive(Debug, Clone)]
pub enum SinkEvent {
    /// A bot was stored, with the owner after its bot count changed
    BotDeployed { bot: Bot, owner: Owner },
    /// A trade was stored. `bot` is the updated record, absent for orphaned trades
    TradeExecuted { trade: Trade, bot: Option<Bot> },
}

impl SinkEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SinkEvent::BotDeployed { .. } => "BotDeployed",
            SinkEvent::TradeExecuted { .. } => "TradeExecuted",
        }
    }

    /// The bot whose state this event changed, if any
    pub fn bot(&self) -> Option<&Bot> {
        match self {
            SinkEvent::BotDeployed { bot, .. } => Some(bot),
            SinkEvent::TradeExecuted { bot, .. } => bot.as_ref(),
        }
    }
}

/// Trait for event sinks (database, cache, pinning)
#[async_trait]
pub trait EventSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle_event(&self, event: SinkEvent) -> Result<()>;

    /// Every log up to and including `block` has been handed to `handle_event`
    async fn checkpoint(&self, _block: u64, _timestamp: Option<u64>) -> Result<()> {
        Ok(())
    }
}
