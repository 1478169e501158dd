use super::{from_decimal, hex, parse_address, to_decimal};
use crate::Result;
use bigdecimal::BigDecimal;
use indexer_core::types::Owner;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for owners table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbOwner {
    pub address: String,
    pub chain_id: i64,
    pub bot_count: i64,
    pub total_pnl: BigDecimal,
}

impl DbOwner {
    pub fn from_owner(chain_id: u64, owner: &Owner) -> Self {
        Self {
            address: hex(&owner.address),
            chain_id: chain_id as i64,
            bot_count: owner.bot_count as i64,
            total_pnl: to_decimal(owner.total_pnl.clone()),
        }
    }

    pub fn into_owner(self) -> Result<Owner> {
        Ok(Owner {
            address: parse_address("address", &self.address)?,
            bot_count: self.bot_count.max(0) as u64,
            total_pnl: from_decimal(&self.total_pnl),
        })
    }
}
