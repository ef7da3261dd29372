//! HTTP sink - POSTs each record to a collector

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{FacetSink, SinkError};

/// Posts records as JSON to a collector URL
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let url = url.into();
        debug!(%url, timeout_ms = timeout.as_millis() as u64, "HttpSink::new: called");
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(SinkError::Config(format!("sink url must be http(s): {}", url)));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("jobtracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl FacetSink for HttpSink {
    async fn send(&self, payload: &Value) -> Result<(), SinkError> {
        debug!(url = %self.url, "HttpSink::send: called");
        let response = self.client.post(&self.url).json(payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "HttpSink::send: collector rejected record");
            return Err(SinkError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "http"
    }
}
