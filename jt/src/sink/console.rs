//! Console sink - one JSON line per record on stdout

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use super::{FacetSink, SinkError};

#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FacetSink for ConsoleSink {
    async fn send(&self, payload: &Value) -> Result<(), SinkError> {
        let line = serde_json::to_string(payload)?;
        info!(payload = %line, "ConsoleSink::send");
        println!("{}", line);
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "console"
    }
}
