pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::{DeploymentConfig, DuplicateDeploymentPolicy, IndexerConfig, ServiceConfig, SyncConfig};
pub use error::{IndexerError, Result};
