use alloy_primitives::{Address, U256};
use bigdecimal::num_bigint::BigInt;
use std::fmt;
use std::str::FromStr;

use crate::error::IndexerError;

/// Trading strategy a bot runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Dca,
    Arbitrage,
    Custom,
    /// Placeholder until the bot's configuration is read off-chain
    #[default]
    Unknown,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Dca => "DCA",
            Strategy::Arbitrage => "ARBITRAGE",
            Strategy::Custom => "CUSTOM",
            Strategy::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = IndexerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DCA" => Ok(Strategy::Dca),
            "ARBITRAGE" => Ok(Strategy::Arbitrage),
            "CUSTOM" => Ok(Strategy::Custom),
            "UNKNOWN" => Ok(Strategy::Unknown),
            other => Err(IndexerError::EventDecode(format!("unknown strategy '{}'", other))),
        }
    }
}

/// Lifecycle status of a bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotStatus {
    #[default]
    Active,
    Paused,
    Stopped,
}

impl BotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotStatus::Active => "ACTIVE",
            BotStatus::Paused => "PAUSED",
            BotStatus::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BotStatus {
    type Err = IndexerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(BotStatus::Active),
            "PAUSED" => Ok(BotStatus::Paused),
            "STOPPED" => Ok(BotStatus::Stopped),
            other => Err(IndexerError::EventDecode(format!("unknown bot status '{}'", other))),
        }
    }
}

/// A deployed trading bot, keyed by its NFT token id
#[derive(Debug, Clone, PartialEq)]
pub struct Bot {
    /// Decimal rendering of the token id
    pub id: String,
    /// Bot contract address (emitter of TradeExecuted)
    pub address: Address,
    /// Wallet that owns the bot NFT
    pub owner: Address,
    pub token_id: U256,
    pub name: String,
    pub strategy: Strategy,
    pub status: BotStatus,
    pub base_token: Option<Address>,
    pub quote_token: Option<Address>,
    /// Per-trade notional in base token units
    pub trade_amount: U256,
    /// Basis points
    pub min_profit_target: u32,
    /// Basis points
    pub max_drawdown: u32,
    pub total_trades: u64,
    pub total_pnl: BigInt,
    /// Block timestamp of the deployment
    pub created_at: u64,
    /// Block timestamp of the last change
    pub updated_at: u64,
}

impl Bot {
    /// Fresh record for a bot seen in a deployment event
    pub fn deployed(token_id: U256, address: Address, owner: Address, timestamp: u64) -> Self {
        let id = token_id.to_string();
        Self {
            name: format!("Bot #{}", id),
            id,
            address,
            owner,
            token_id,
            strategy: Strategy::Unknown,
            status: BotStatus::Active,
            base_token: None,
            quote_token: None,
            trade_amount: U256::ZERO,
            min_profit_target: 0,
            max_drawdown: 0,
            total_trades: 0,
            total_pnl: BigInt::default(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Fold one executed trade into the running totals
    pub fn record_trade(&mut self, pnl: &BigInt, timestamp: u64) {
        self.total_trades += 1;
        self.total_pnl += pnl;
        self.updated_at = timestamp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployed_bot_defaults() {
        let bot = Bot::deployed(U256::from(42u64), Address::repeat_byte(0xb0), Address::repeat_byte(0xaa), 1_700_000_000);

        assert_eq!(bot.id, "42");
        assert_eq!(bot.name, "Bot #42");
        assert_eq!(bot.strategy, Strategy::Unknown);
        assert_eq!(bot.status, BotStatus::Active);
        assert_eq!(bot.total_trades, 0);
        assert_eq!(bot.total_pnl, BigInt::from(0));
        assert_eq!(bot.trade_amount, U256::ZERO);
        assert_eq!(bot.created_at, bot.updated_at);
    }

    #[test]
    fn test_record_trade_accumulates_signed_pnl() {
        let mut bot = Bot::deployed(U256::from(1u64), Address::ZERO, Address::ZERO, 10);

        bot.record_trade(&BigInt::from(50), 20);
        bot.record_trade(&BigInt::from(-70), 30);

        assert_eq!(bot.total_trades, 2);
        assert_eq!(bot.total_pnl, BigInt::from(-20));
        assert_eq!(bot.updated_at, 30);
        assert_eq!(bot.created_at, 10);
    }

    #[test]
    fn test_strategy_and_status_round_trip_labels() {
        for strategy in [Strategy::Dca, Strategy::Arbitrage, Strategy::Custom, Strategy::Unknown] {
            assert_eq!(strategy.as_str().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("PAUSED".parse::<BotStatus>().unwrap(), BotStatus::Paused);
        assert!("paused".parse::<BotStatus>().is_err());
    }
}
