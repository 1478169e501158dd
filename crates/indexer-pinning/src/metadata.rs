use indexer_core::types::Bot;
use serde::{Deserialize, Serialize};

/// NFT metadata document pinned for a bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub attributes: BotAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotAttributes {
    pub strategy: String,
    pub total_trades: u64,
    /// Decimal string, cumulative PnL can exceed any JSON number
    pub pnl: String,
}

impl From<&Bot> for BotMetadata {
    fn from(bot: &Bot) -> Self {
        Self {
            name: bot.name.clone(),
            description: format!("Trading bot {:#x} owned by {:#x}", bot.address, bot.owner),
            image: String::new(),
            attributes: BotAttributes {
                strategy: bot.strategy.to_string(),
                total_trades: bot.total_trades,
                pnl: bot.total_pnl.to_string(),
            },
        }
    }
}

/// Request envelope for `pinJSONToIPFS`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PinRequest<'a> {
    pub pinata_content: &'a BotMetadata,
    pub pinata_metadata: PinName<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PinName<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use serde_json::json;

    fn metadata() -> BotMetadata {
        let bot = Bot::deployed(
            U256::from(3u64),
            Address::repeat_byte(0x01),
            Address::repeat_byte(0xaa),
            0,
        );
        BotMetadata::from(&bot)
    }

    #[test]
    fn test_metadata_serializes_attribute_names() {
        let json = serde_json::to_value(metadata()).unwrap();
        assert_eq!(json["name"], "Bot #3");
        assert_eq!(
            json["attributes"],
            json!({"strategy": "UNKNOWN", "totalTrades": 0, "pnl": "0"})
        );
    }

    #[test]
    fn test_pin_request_envelope() {
        let metadata = metadata();
        let request = PinRequest {
            pinata_content: &metadata,
            pinata_metadata: PinName { name: "bot-3" },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pinataMetadata"]["name"], "bot-3");
        assert_eq!(json["pinataContent"]["name"], "Bot #3");
    }

    #[test]
    fn test_pin_response_parses_hash() {
        let body = r#"{"IpfsHash":"QmTest","PinSize":120,"Timestamp":"2024-01-01T00:00:00Z"}"#;
        let response: PinResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.ipfs_hash, "QmTest");
    }
}
