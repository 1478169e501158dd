use super::{from_decimal, hex, parse_address, to_decimal, u256_from_decimal};
use crate::{DatabaseError, Result};
use bigdecimal::BigDecimal;
use indexer_core::types::{unsigned_to_bigint, Bot};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for bots table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbBot {
    /// Token id, decimal
    pub id: String,
    pub chain_id: i64,
    pub address: String,
    pub owner: String,
    pub token_id: BigDecimal,
    pub name: String,
    pub strategy: String,
    pub status: String,
    pub base_token: Option<String>,
    pub quote_token: Option<String>,
    pub trade_amount: BigDecimal,
    pub min_profit_target: i32,
    pub max_drawdown: i32,
    pub total_trades: i64,
    pub total_pnl: BigDecimal,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DbBot {
    pub fn from_bot(chain_id: u64, bot: &Bot) -> Self {
        Self {
            id: bot.id.clone(),
            chain_id: chain_id as i64,
            address: hex(&bot.address),
            owner: hex(&bot.owner),
            token_id: to_decimal(unsigned_to_bigint(bot.token_id)),
            name: bot.name.clone(),
            strategy: bot.strategy.to_string(),
            status: bot.status.to_string(),
            base_token: bot.base_token.as_ref().map(hex),
            quote_token: bot.quote_token.as_ref().map(hex),
            trade_amount: to_decimal(unsigned_to_bigint(bot.trade_amount)),
            min_profit_target: bot.min_profit_target as i32,
            max_drawdown: bot.max_drawdown as i32,
            total_trades: bot.total_trades as i64,
            total_pnl: to_decimal(bot.total_pnl.clone()),
            created_at: bot.created_at as i64,
            updated_at: bot.updated_at as i64,
        }
    }

    pub fn into_bot(self) -> Result<Bot> {
        let parse_label = |column: &str, e: indexer_core::IndexerError| {
            DatabaseError::Serialization(format!("{}: {}", column, e))
        };

        Ok(Bot {
            address: parse_address("address", &self.address)?,
            owner: parse_address("owner", &self.owner)?,
            token_id: u256_from_decimal("token_id", &self.token_id)?,
            strategy: self.strategy.parse().map_err(|e| parse_label("strategy", e))?,
            status: self.status.parse().map_err(|e| parse_label("status", e))?,
            base_token: self
                .base_token
                .as_deref()
                .map(|a| parse_address("base_token", a))
                .transpose()?,
            quote_token: self
                .quote_token
                .as_deref()
                .map(|a| parse_address("quote_token", a))
                .transpose()?,
            trade_amount: u256_from_decimal("trade_amount", &self.trade_amount)?,
            min_profit_target: self.min_profit_target.max(0) as u32,
            max_drawdown: self.max_drawdown.max(0) as u32,
            total_trades: self.total_trades.max(0) as u64,
            total_pnl: from_decimal(&self.total_pnl),
            created_at: self.created_at.max(0) as u64,
            updated_at: self.updated_at.max(0) as u64,
            id: self.id,
            name: self.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use indexer_core::types::{BigInt, Strategy};

    #[test]
    fn test_bot_row_restores_domain_record() {
        let mut bot = Bot::deployed(
            U256::from(9u64),
            Address::repeat_byte(0x09),
            Address::repeat_byte(0xaa),
            1_700_000_000,
        );
        bot.strategy = Strategy::Arbitrage;
        bot.quote_token = Some(Address::repeat_byte(0x0c));
        bot.record_trade(&BigInt::from(-20), 1_700_000_050);

        let row = DbBot::from_bot(11155111, &bot);
        assert_eq!(row.owner, format!("{:#x}", Address::repeat_byte(0xaa)));
        assert_eq!(row.strategy, "ARBITRAGE");
        assert_eq!(row.total_pnl.to_string(), "-20");

        assert_eq!(row.into_bot().unwrap(), bot);
    }

    #[test]
    fn test_bot_row_with_bad_status_fails() {
        let bot = Bot::deployed(U256::from(1u64), Address::ZERO, Address::ZERO, 0);
        let mut row = DbBot::from_bot(1, &bot);
        row.status = "RUNNING".to_string();
        assert!(matches!(row.into_bot(), Err(DatabaseError::Serialization(_))));
    }
}
