use alloy::eips::BlockNumberOrTag;
use alloy::network::Ethereum;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log, Transaction};
use alloy_primitives::{Address, B256, U256};
use indexer_core::{IndexerError, Result, ServiceConfig};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Boxed provider trait for HTTP connections
pub type BoxedProvider = Arc<dyn Provider<Ethereum> + Send + Sync>;

/// JSON-RPC access for the indexer. Every failure is logged before it is returned
pub struct ProviderManager {
    http: BoxedProvider,
    ws_url: String,
}

impl ProviderManager {
    pub fn new(http_url: &str, ws_url: &str) -> Result<Self> {
        let http_url: reqwest::Url = http_url
            .parse()
            .map_err(|e| IndexerError::Rpc(format!("Invalid HTTP URL: {}", e)))?;

        let http = ProviderBuilder::new().connect_http(http_url);

        Ok(Self {
            http: Arc::new(http),
            ws_url: ws_url.to_string(),
        })
    }

    pub fn from_config(services: &ServiceConfig) -> Result<Self> {
        Self::new(&services.rpc_url, &services.ws_url)
    }

    pub fn http(&self) -> &BoxedProvider {
        &self.http
    }

    /// Configured WebSocket URL, handed to consumers that subscribe themselves
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Issue an arbitrary JSON-RPC request
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let start = Instant::now();
        let params = serde_json::value::to_raw_value(&params)
            .map_err(|e| IndexerError::Rpc(format!("Invalid params for {}: {}", method, e)))?;

        let result = self
            .http
            .raw_request_dyn(method.to_string().into(), &params)
            .await;
        indexer_metrics::histograms::rpc_request_duration(start.elapsed(), method);

        let raw = result.map_err(|e| rpc_failure(method, e))?;
        serde_json::from_str(raw.get())
            .map_err(|e| IndexerError::Rpc(format!("Malformed {} response: {}", method, e)))
    }

    pub async fn block_number(&self) -> Result<u64> {
        let start = Instant::now();
        let result = self.http.get_block_number().await;
        indexer_metrics::histograms::rpc_request_duration(start.elapsed(), "eth_blockNumber");
        result.map_err(|e| rpc_failure("eth_blockNumber", e))
    }

    pub async fn balance(&self, address: Address) -> Result<U256> {
        let start = Instant::now();
        let result = self.http.get_balance(address).await;
        indexer_metrics::histograms::rpc_request_duration(start.elapsed(), "eth_getBalance");
        result.map_err(|e| rpc_failure("eth_getBalance", e))
    }

    pub async fn transaction(&self, hash: B256) -> Result<Option<Transaction>> {
        let start = Instant::now();
        let result = self.http.get_transaction_by_hash(hash).await;
        indexer_metrics::histograms::rpc_request_duration(
            start.elapsed(),
            "eth_getTransactionByHash",
        );
        result.map_err(|e| rpc_failure("eth_getTransactionByHash", e))
    }

    /// Timestamp of a block, `None` if the node does not know it yet
    pub async fn block_timestamp(&self, number: u64) -> Result<Option<u64>> {
        let start = Instant::now();
        let result = self
            .http
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await;
        indexer_metrics::histograms::rpc_request_duration(start.elapsed(), "eth_getBlockByNumber");

        let block = result.map_err(|e| rpc_failure("eth_getBlockByNumber", e))?;
        Ok(block.map(|b| b.header.timestamp))
    }

    pub async fn logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        let start = Instant::now();
        let result = self.http.get_logs(filter).await;
        indexer_metrics::histograms::rpc_request_duration(start.elapsed(), "eth_getLogs");

        let logs = result.map_err(|e| rpc_failure("eth_getLogs", e))?;
        if !logs.is_empty() {
            debug!(count = logs.len(), "Fetched event logs");
        }
        Ok(logs)
    }
}

fn rpc_failure<E: Debug>(method: &str, e: E) -> IndexerError {
    // Debug format keeps the full error chain including response details
    let message = format!("{:?}", e);
    error!(method = %method, error = %message, "RPC request failed");
    indexer_metrics::counters::errors(1, "rpc");
    IndexerError::Rpc(message)
}
