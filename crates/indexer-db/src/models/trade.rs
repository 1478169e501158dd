use super::{hex, i256_from_decimal, parse_address, parse_hash, to_decimal, u256_from_decimal};
use crate::Result;
use bigdecimal::BigDecimal;
use indexer_core::types::{unsigned_to_bigint, Trade, TradeKey};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for trades table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbTrade {
    /// Primary key: txHash-logIndex
    pub id: String,
    pub chain_id: i64,
    /// Bot contract that emitted the trade
    pub bot: String,
    pub transaction_id: String,
    pub log_index: i64,
    pub block_number: i64,
    pub timestamp: i64,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: BigDecimal,
    pub amount_out: BigDecimal,
    pub pnl: BigDecimal,
}

impl DbTrade {
    pub fn from_trade(chain_id: u64, trade: &Trade) -> Self {
        Self {
            id: trade.id(),
            chain_id: chain_id as i64,
            bot: hex(&trade.bot_address),
            transaction_id: format!("{:#x}", trade.key.tx_hash),
            log_index: trade.key.log_index as i64,
            block_number: trade.block_number as i64,
            timestamp: trade.timestamp as i64,
            token_in: hex(&trade.token_in),
            token_out: hex(&trade.token_out),
            amount_in: to_decimal(unsigned_to_bigint(trade.amount_in)),
            amount_out: to_decimal(unsigned_to_bigint(trade.amount_out)),
            pnl: to_decimal(trade.pnl_bigint()),
        }
    }

    pub fn into_trade(self) -> Result<Trade> {
        Ok(Trade {
            key: TradeKey::new(
                parse_hash("transaction_id", &self.transaction_id)?,
                self.log_index.max(0) as u64,
            ),
            bot_address: parse_address("bot", &self.bot)?,
            timestamp: self.timestamp.max(0) as u64,
            token_in: parse_address("token_in", &self.token_in)?,
            token_out: parse_address("token_out", &self.token_out)?,
            amount_in: u256_from_decimal("amount_in", &self.amount_in)?,
            amount_out: u256_from_decimal("amount_out", &self.amount_out)?,
            pnl: i256_from_decimal("pnl", &self.pnl)?,
            block_number: self.block_number.max(0) as u64,
        })
    }
}
