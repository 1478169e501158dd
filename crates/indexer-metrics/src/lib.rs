//! Prometheus metrics for the bot indexer
//!
//! Counters, gauges and histograms are recorded through the `metrics` facade and are no-ops
//! until [`MetricsServer::run`] installs the exporter.

pub mod config;
pub mod counters;
pub mod gauges;
pub mod histograms;
pub mod server;

pub use config::MetricsConfig;
pub use server::{HealthReport, MetricsServer};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Metrics server error: {0}")]
    Server(String),

    #[error("Failed to install metrics recorder: {0}")]
    Recorder(String),
}

pub type Result<T> = std::result::Result<T, MetricsError>;

fn describe_all() {
    counters::init();
    gauges::init();
    histograms::init();
}
