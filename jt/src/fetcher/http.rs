//! HTTP implementation of SnapshotFetcher

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{FetchError, SnapshotFetcher};
use crate::domain::{JobId, ProgressSnapshot};
use crate::tracker::TrackerConfig;

/// Body returned by `GET /jobs/{job_id}/checkpoints`
///
/// Only the `counts` object is read; the engine also returns history,
/// summary and latest sections which are ignored.
#[derive(Debug, Deserialize)]
struct CheckpointsResponse {
    counts: CheckpointCounts,
}

#[derive(Debug, Deserialize)]
struct CheckpointCounts {
    completed: u64,
    failed: u64,
    in_progress: u64,
    restored: u64,
    total: u64,
}

/// Parse a checkpoint status body into a snapshot
pub fn parse_checkpoint_counts(body: &str) -> Result<ProgressSnapshot, FetchError> {
    let response: CheckpointsResponse = serde_json::from_str(body)?;
    let counts = response.counts;
    Ok(ProgressSnapshot::new(
        counts.completed,
        counts.failed,
        counts.in_progress,
        counts.restored,
        counts.total,
    ))
}

/// Fetches checkpoint counts over HTTP
pub struct HttpSnapshotFetcher {
    client: reqwest::Client,
    config: TrackerConfig,
}

impl HttpSnapshotFetcher {
    /// Create a fetcher using the tracker's endpoint and request timeout
    pub fn from_config(config: &TrackerConfig) -> Result<Self, FetchError> {
        let timeout = config.request_timeout();
        debug!(base_url = %config.base_url(), timeout_ms = timeout.as_millis() as u64, "HttpSnapshotFetcher::from_config: called");
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("jobtracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// URL polled for a given job
    pub fn endpoint(&self, job_id: &JobId) -> String {
        self.config.endpoint_for(job_id)
    }
}

#[async_trait]
impl SnapshotFetcher for HttpSnapshotFetcher {
    async fn fetch(&self, job_id: &JobId) -> Result<ProgressSnapshot, FetchError> {
        let url = self.endpoint(job_id);
        debug!(%job_id, %url, "HttpSnapshotFetcher::fetch: called");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%job_id, %status, "HttpSnapshotFetcher::fetch: non-success status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        debug!(%job_id, body_len = body.len(), "HttpSnapshotFetcher::fetch: body read");
        parse_checkpoint_counts(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_counts() {
        let body = r#"{"counts":{"completed":1,"failed":5,"in_progress":6,"restored":7,"total":1}}"#;
        let snapshot = parse_checkpoint_counts(body).unwrap();
        assert_eq!(snapshot, ProgressSnapshot::new(1, 5, 6, 7, 1));
    }

    #[test]
    fn test_parse_ignores_extra_sections() {
        let body = r#"{
            "counts": {"completed": 2, "failed": 0, "in_progress": 1, "restored": 0, "total": 3},
            "summary": {"state_size": {"min": 0, "max": 10}},
            "latest": {"completed": null},
            "history": []
        }"#;
        let snapshot = parse_checkpoint_counts(body).unwrap();
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.in_progress, 1);
    }

    #[test]
    fn test_parse_missing_counts_is_error() {
        let err = parse_checkpoint_counts(r#"{"history":[]}"#).unwrap_err();
        assert_eq!(err.kind(), "body");
    }

    #[test]
    fn test_parse_negative_counter_is_error() {
        let body = r#"{"counts":{"completed":-1,"failed":0,"in_progress":0,"restored":0,"total":0}}"#;
        assert!(parse_checkpoint_counts(body).is_err());
    }

    #[test]
    fn test_endpoint_uses_config() {
        let config = TrackerConfig {
            base_url: "http://localhost:18088/jobs/".to_string(),
            ..Default::default()
        };
        let fetcher = HttpSnapshotFetcher::from_config(&config).unwrap();
        assert_eq!(
            fetcher.endpoint(&JobId::new("abc")),
            "http://localhost:18088/jobs/abc/checkpoints"
        );
    }
}
