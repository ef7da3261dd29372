//! Tracker configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::TrackerError;
use crate::domain::JobId;

/// Placeholder substituted with the job id in templated endpoints
pub const JOB_ID_PLACEHOLDER: &str = "{job_id}";

/// Configuration for a ContinuousJobTracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL of the jobs API, or a template containing `{job_id}`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// REST address of the job engine; with `rest-port` overrides `base-url`
    #[serde(rename = "rest-address", skip_serializing_if = "Option::is_none")]
    pub rest_address: Option<String>,

    /// REST port of the job engine
    #[serde(rename = "rest-port", skip_serializing_if = "Option::is_none")]
    pub rest_port: Option<u16>,

    /// Polling interval in milliseconds
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Per-request timeout in milliseconds
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// How long stop waits for an in-flight tick before aborting it
    #[serde(rename = "stop-grace-ms")]
    pub stop_grace_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081/jobs".to_string(),
            rest_address: None,
            rest_port: None,
            poll_interval_ms: 10_000,
            request_timeout_ms: 5_000,
            stop_grace_ms: 5_000,
        }
    }
}

impl TrackerConfig {
    /// Build a config pointing at a job engine's REST address and port
    pub fn for_rest_endpoint(address: impl Into<String>, port: u16) -> Self {
        Self {
            rest_address: Some(address.into()),
            rest_port: Some(port),
            ..Default::default()
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }

    /// Check the settings a session cannot run without
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.poll_interval_ms == 0 {
            return Err(TrackerError::InvalidConfig(
                "tracker.poll-interval-ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective base URL after applying the REST address/port override
    pub fn base_url(&self) -> String {
        match (&self.rest_address, self.rest_port) {
            (Some(address), Some(port)) => format!("http://{}:{}/jobs", address, port),
            _ => self.base_url.clone(),
        }
    }

    /// Status endpoint polled for `job_id`
    pub fn endpoint_for(&self, job_id: &JobId) -> String {
        let base = self.base_url();
        if base.contains(JOB_ID_PLACEHOLDER) {
            return base.replace(JOB_ID_PLACEHOLDER, job_id.as_str());
        }
        format!("{}/{}/checkpoints", base.trim_end_matches('/'), job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.stop_grace(), Duration::from_secs(5));
        assert_eq!(config.base_url(), "http://localhost:8081/jobs");
    }

    #[test]
    fn test_endpoint_appends_checkpoints_path() {
        let config = TrackerConfig {
            base_url: "http://localhost:18088/jobs/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint_for(&JobId::new("42")),
            "http://localhost:18088/jobs/42/checkpoints"
        );
    }

    #[test]
    fn test_endpoint_template() {
        let config = TrackerConfig {
            base_url: "http://engine/v1/jobs/{job_id}/checkpoints?details=false".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint_for(&JobId::new("abc")),
            "http://engine/v1/jobs/abc/checkpoints?details=false"
        );
    }

    #[test]
    fn test_rest_endpoint_overrides_base_url() {
        let config = TrackerConfig::for_rest_endpoint("flink-jm", 18088);
        assert_eq!(config.base_url(), "http://flink-jm:18088/jobs");

        let partial = TrackerConfig {
            rest_address: Some("flink-jm".to_string()),
            ..Default::default()
        };
        assert_eq!(partial.base_url(), "http://localhost:8081/jobs");
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        assert!(TrackerConfig::default().validate().is_ok());

        let config = TrackerConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfig(_)));
        assert!(err.to_string().contains("poll-interval-ms"));
    }

    #[test]
    fn test_yaml_keys() {
        let yaml = "base-url: http://example/jobs\npoll-interval-ms: 100\n";
        let config: TrackerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://example/jobs");
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.stop_grace_ms, 5_000);
    }
}
