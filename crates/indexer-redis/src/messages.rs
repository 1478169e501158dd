use indexer_core::types::Bot;
use serde::{Deserialize, Serialize};

/// Cached bot state, amounts as decimal strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotStateMessage {
    pub id: String,
    pub address: String,
    pub owner: String,
    pub name: String,
    pub strategy: String,
    pub status: String,
    pub total_trades: u64,
    pub total_pnl: String,
    pub updated_at: u64,
}

impl From<&Bot> for BotStateMessage {
    fn from(bot: &Bot) -> Self {
        Self {
            id: bot.id.clone(),
            address: format!("{:#x}", bot.address),
            owner: format!("{:#x}", bot.owner),
            name: bot.name.clone(),
            strategy: bot.strategy.to_string(),
            status: bot.status.to_string(),
            total_trades: bot.total_trades,
            total_pnl: bot.total_pnl.to_string(),
            updated_at: bot.updated_at,
        }
    }
}
