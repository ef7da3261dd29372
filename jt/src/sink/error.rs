//! Sink error types

use thiserror::Error;

/// Errors raised while delivering a facet record
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Collector returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid sink configuration: {0}")]
    Config(String),
}
