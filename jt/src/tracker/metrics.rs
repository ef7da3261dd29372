//! Tracker metrics
//!
//! Counters are keyed by job id:
//! - polls attempted
//! - poll successes and failures
//! - facets emitted
//! - callback failures
//!
//! plus a poll latency timer.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::JobId;

/// Counters recorded by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Polls,
    PollSuccesses,
    PollFailures,
    Emitted,
    CallbackFailures,
}

/// Sink receiving tracker counters and timings
///
/// Implementations must be safe to call from the tracker's background task.
pub trait MetricsSink: Send + Sync {
    fn increment(&self, job_id: &JobId, counter: Counter);

    fn record_poll_latency(&self, job_id: &JobId, latency: Duration);
}

/// Per-job counter values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobCounters {
    pub job_id: String,
    pub polls: u64,
    pub poll_successes: u64,
    pub poll_failures: u64,
    pub emitted: u64,
    pub callback_failures: u64,
    /// Latency of the most recent poll in ms
    pub last_poll_latency_ms: u64,
    /// Sum of all poll latencies in ms
    pub total_poll_latency_ms: u64,
    /// Number of latency samples
    pub latency_samples: u64,
    pub last_emitted_at: Option<DateTime<Utc>>,
}

impl JobCounters {
    fn new(job_id: &JobId) -> Self {
        Self {
            job_id: job_id.to_string(),
            ..Default::default()
        }
    }

    /// Average poll latency in ms
    pub fn avg_poll_latency_ms(&self) -> f64 {
        if self.latency_samples == 0 {
            0.0
        } else {
            self.total_poll_latency_ms as f64 / self.latency_samples as f64
        }
    }
}

/// In-memory metrics for any number of tracked jobs
#[derive(Debug, Default)]
pub struct TrackerMetrics {
    jobs: RwLock<HashMap<JobId, JobCounters>>,
}

impl TrackerMetrics {
    pub fn new() -> Self {
        debug!("TrackerMetrics::new: called");
        Self::default()
    }

    /// Counter values for a job, if it has been polled at least once
    pub fn snapshot(&self, job_id: &JobId) -> Option<JobCounters> {
        debug!(%job_id, "TrackerMetrics::snapshot: called");
        self.jobs.read().ok().and_then(|jobs| jobs.get(job_id).cloned())
    }

    fn with_job<F: FnOnce(&mut JobCounters)>(&self, job_id: &JobId, f: F) {
        if let Ok(mut jobs) = self.jobs.write() {
            let counters = jobs.entry(job_id.clone()).or_insert_with(|| JobCounters::new(job_id));
            f(counters);
        } else {
            debug!(%job_id, "with_job: failed to acquire jobs write lock");
        }
    }
}

impl MetricsSink for TrackerMetrics {
    fn increment(&self, job_id: &JobId, counter: Counter) {
        self.with_job(job_id, |c| match counter {
            Counter::Polls => c.polls += 1,
            Counter::PollSuccesses => c.poll_successes += 1,
            Counter::PollFailures => c.poll_failures += 1,
            Counter::Emitted => {
                c.emitted += 1;
                c.last_emitted_at = Some(Utc::now());
            }
            Counter::CallbackFailures => c.callback_failures += 1,
        });
    }

    fn record_poll_latency(&self, job_id: &JobId, latency: Duration) {
        let ms = latency.as_millis() as u64;
        self.with_job(job_id, |c| {
            c.last_poll_latency_ms = ms;
            c.total_poll_latency_ms += ms;
            c.latency_samples += 1;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_keyed_by_job() {
        let metrics = TrackerMetrics::new();
        let a = JobId::new("a");
        let b = JobId::new("b");

        metrics.increment(&a, Counter::Polls);
        metrics.increment(&a, Counter::Polls);
        metrics.increment(&a, Counter::PollFailures);
        metrics.increment(&b, Counter::Polls);
        metrics.increment(&b, Counter::PollSuccesses);

        let a_counters = metrics.snapshot(&a).unwrap();
        assert_eq!(a_counters.polls, 2);
        assert_eq!(a_counters.poll_failures, 1);
        assert_eq!(a_counters.poll_successes, 0);

        let b_counters = metrics.snapshot(&b).unwrap();
        assert_eq!(b_counters.polls, 1);
        assert_eq!(b_counters.poll_successes, 1);

        assert!(metrics.snapshot(&JobId::new("c")).is_none());
    }

    #[test]
    fn test_emitted_sets_timestamp() {
        let metrics = TrackerMetrics::new();
        let job = JobId::new("job");
        metrics.increment(&job, Counter::Emitted);

        let counters = metrics.snapshot(&job).unwrap();
        assert_eq!(counters.emitted, 1);
        assert!(counters.last_emitted_at.is_some());
    }

    #[test]
    fn test_poll_latency_average() {
        let metrics = TrackerMetrics::new();
        let job = JobId::new("job");
        metrics.record_poll_latency(&job, Duration::from_millis(10));
        metrics.record_poll_latency(&job, Duration::from_millis(30));

        let counters = metrics.snapshot(&job).unwrap();
        assert_eq!(counters.last_poll_latency_ms, 30);
        assert_eq!(counters.avg_poll_latency_ms(), 20.0);
        assert_eq!(JobCounters::default().avg_poll_latency_ms(), 0.0);
    }
}
