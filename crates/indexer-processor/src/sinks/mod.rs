mod cache;
mod database;
mod pinning;
pub mod traits;

pub use cache::CacheSink;
pub use database::DatabaseSink;
pub use pinning::PinningSink;
pub use traits::{EventSink, SinkEvent};

use indexer_core::IndexerError;
use std::sync::Arc;
use tracing::warn;

/// Composite sink that fans out to multiple sinks
pub struct CompositeSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Deliver to every sink. A failing sink does not stop the others
    pub async fn emit(&self, event: SinkEvent) -> Vec<(&'static str, IndexerError)> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.handle_event(event.clone()).await {
                warn!(sink = sink.name(), event = event.kind(), error = %e, "Sink failed");
                failures.push((sink.name(), e));
            }
        }
        failures
    }

    /// Forward a processed-window checkpoint to every sink
    pub async fn checkpoint(
        &self,
        block: u64,
        timestamp: Option<u64>,
    ) -> Vec<(&'static str, IndexerError)> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.checkpoint(block, timestamp).await {
                warn!(sink = sink.name(), block, error = %e, "Sink checkpoint failed");
                failures.push((sink.name(), e));
            }
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Default for CompositeSink {
    fn default() -> Self {
        Self::new()
    }
}
