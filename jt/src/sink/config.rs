//! Sink configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::{ConsoleSink, FacetSink, HttpSink, SinkError, TransformSink};

fn default_timeout_ms() -> u64 {
    5_000
}

/// Sink selection, tagged by `type`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SinkConfig {
    /// Print records to stdout
    #[default]
    Console,

    /// POST records to a collector
    Http {
        url: String,

        #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
        timeout_ms: u64,
    },

    /// Merge static fields into records, then hand them to another sink
    Transform {
        #[serde(default)]
        fields: Map<String, Value>,

        inner: Box<SinkConfig>,
    },
}

impl SinkConfig {
    /// Type name as written in configuration
    pub fn sink_type(&self) -> &'static str {
        match self {
            SinkConfig::Console => "console",
            SinkConfig::Http { .. } => "http",
            SinkConfig::Transform { .. } => "transform",
        }
    }

    /// Construct the configured sink
    pub fn build(&self) -> Result<Box<dyn FacetSink>, SinkError> {
        debug!(sink_type = self.sink_type(), "SinkConfig::build: called");
        match self {
            SinkConfig::Console => Ok(Box::new(ConsoleSink::new())),
            SinkConfig::Http { url, timeout_ms } => {
                Ok(Box::new(HttpSink::new(url.clone(), Duration::from_millis(*timeout_ms))?))
            }
            SinkConfig::Transform { fields, inner } => {
                let inner = inner.build()?;
                Ok(Box::new(TransformSink::new(fields.clone(), inner)))
            }
        }
    }
}
