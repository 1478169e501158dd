use crate::config::MetricsConfig;
use crate::{gauges, MetricsError};
use axum::{routing::get, Json, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use tracing::info;

/// Serves the Prometheus scrape endpoint and a sync health check
pub struct MetricsServer {
    config: MetricsConfig,
}

/// `/health` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub current_block: u64,
    pub chain_head: u64,
    pub blocks_behind: u64,
}

impl HealthReport {
    /// `starting` until the first head poll lands, then `ok`
    pub fn from_progress(current_block: u64, chain_head: u64) -> Self {
        Self {
            status: if chain_head == 0 { "starting" } else { "ok" },
            current_block,
            chain_head,
            blocks_behind: chain_head.saturating_sub(current_block),
        }
    }
}

impl MetricsServer {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    /// Install the Prometheus recorder and serve `/metrics` and `/health`
    pub async fn run(self) -> crate::Result<()> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .map_err(|e| MetricsError::Recorder(e.to_string()))?;
        crate::describe_all();

        let app = router(handle);
        let addr = self.config.address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| MetricsError::Server(format!("bind {}: {}", addr, e)))?;
        info!(address = %addr, "Metrics server listening");

        axum::serve(listener, app)
            .await
            .map_err(|e| MetricsError::Server(e.to_string()))
    }
}

fn router(handle: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(move || render(handle.clone())))
        .route("/health", get(health))
}

async fn render(handle: PrometheusHandle) -> String {
    handle.render()
}

async fn health() -> Json<HealthReport> {
    let (current_block, chain_head) = gauges::sync_progress();
    Json(HealthReport::from_progress(current_block, chain_head))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_before_first_head_poll() {
        let report = HealthReport::from_progress(0, 0);
        assert_eq!(report.status, "starting");
        assert_eq!(report.blocks_behind, 0);
    }

    #[test]
    fn test_health_reports_lag() {
        let report = HealthReport::from_progress(1_000, 1_250);
        assert_eq!(report.status, "ok");
        assert_eq!(report.blocks_behind, 250);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["blocksBehind"], 250);
        assert_eq!(json["chainHead"], 1_250);
    }
}
