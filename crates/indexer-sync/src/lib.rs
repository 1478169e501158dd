mod engine;
mod provider;

pub use engine::SyncEngine;
pub use provider::{BoxedProvider, ProviderManager};
