use crate::config::PinningConfig;
use crate::metadata::{BotMetadata, PinName, PinRequest, PinResponse};
use crate::{PinningError, Result};
use reqwest::Client;
use tracing::{error, info};

/// Pinata JSON pinning client
#[derive(Debug, Clone)]
pub struct PinataClient {
    client: Client,
    config: PinningConfig,
}

impl PinataClient {
    pub fn new(config: PinningConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Pin a metadata document and return its `ipfs://` URI
    pub async fn pin_metadata(&self, metadata: &BotMetadata, name: &str) -> Result<String> {
        match self.try_pin(metadata, name).await {
            Ok(uri) => {
                info!(name = %name, uri = %uri, "Metadata pinned to IPFS");
                Ok(uri)
            }
            Err(e) => {
                error!(name = %name, error = %e, "Pinning failed");
                Err(e)
            }
        }
    }

    /// Pin the metadata of a bot under `bot-<tokenId>`
    pub async fn update_bot_metadata(&self, token_id: &str, metadata: &BotMetadata) -> Result<String> {
        self.pin_metadata(metadata, &pin_name(token_id)).await
    }

    async fn try_pin(&self, metadata: &BotMetadata, name: &str) -> Result<String> {
        let request = PinRequest {
            pinata_content: metadata,
            pinata_metadata: PinName { name },
        };

        let response = self
            .client
            .post(self.config.pin_json_url())
            .header("pinata_api_key", &self.config.api_key)
            .header("pinata_secret_api_key", &self.config.api_secret)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PinningError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let pinned: PinResponse = response.json().await?;
        Ok(ipfs_uri(&pinned.ipfs_hash))
    }
}

pub fn pin_name(token_id: &str) -> String {
    format!("bot-{}", token_id)
}

pub fn ipfs_uri(hash: &str) -> String {
    format!("ipfs://{}", hash)
}
