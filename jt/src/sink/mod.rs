//! Facet sinks - where detected checkpoint changes are delivered
//!
//! The tracker callback is synchronous, sinks are async. [`forward`] bridges
//! the two with a bounded channel drained by a background task.

mod config;
mod console;
mod error;
mod forward;
mod http;
mod record;
mod transform;

use async_trait::async_trait;
use serde_json::Value;

pub use config::SinkConfig;
pub use console::ConsoleSink;
pub use error::SinkError;
pub use forward::{DEFAULT_FORWARD_CAPACITY, channel_callback, spawn_forwarder};
pub use http::HttpSink;
pub use record::FacetRecord;
pub use transform::TransformSink;

/// Destination for facet records
#[async_trait]
pub trait FacetSink: Send + Sync {
    /// Deliver one serialized record
    async fn send(&self, payload: &Value) -> Result<(), SinkError>;

    /// Type name as used in configuration
    fn sink_type(&self) -> &'static str;
}
