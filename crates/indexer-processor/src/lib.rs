mod handlers;
mod pipeline;
pub mod sinks;

pub use handlers::{Deployment, ExecutedTrade};
pub use pipeline::EventProcessor;
pub use sinks::{CacheSink, CompositeSink, DatabaseSink, EventSink, PinningSink, SinkEvent};
