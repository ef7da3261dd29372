//! Fetch error types

use thiserror::Error;

/// Failure to obtain a progress snapshot
///
/// The variants exist for log messages only. Callers must not branch on
/// them; every variant is handled by skipping the current tick.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Status endpoint returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed checkpoint response: {0}")]
    Body(#[from] serde_json::Error),
}

impl FetchError {
    /// Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Status { .. } => "status",
            FetchError::Body(_) => "body",
        }
    }
}
