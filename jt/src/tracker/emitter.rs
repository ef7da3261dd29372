//! Emitter - delivers facets to the tracking callback and records metrics

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::error::CallbackError;
use super::metrics::{Counter, MetricsSink};
use crate::domain::{CheckpointFacet, JobId, ProgressSnapshot};
use crate::fetcher::FetchError;

/// Callback invoked with every detected progress change
pub type FacetCallback = Arc<dyn Fn(&CheckpointFacet) -> eyre::Result<()> + Send + Sync>;

/// Builds facets, calls the callback and feeds the metrics sink
pub struct Emitter {
    job_id: JobId,
    callback: FacetCallback,
    metrics: Arc<dyn MetricsSink>,
}

impl Emitter {
    pub fn new(job_id: JobId, callback: FacetCallback, metrics: Arc<dyn MetricsSink>) -> Self {
        debug!(%job_id, "Emitter::new: called");
        Self {
            job_id,
            callback,
            metrics,
        }
    }

    /// Count a tick
    pub fn record_poll(&self) {
        self.metrics.increment(&self.job_id, Counter::Polls);
    }

    pub fn record_success(&self, latency: Duration) {
        self.metrics.increment(&self.job_id, Counter::PollSuccesses);
        self.metrics.record_poll_latency(&self.job_id, latency);
    }

    pub fn record_failure(&self, err: &FetchError, latency: Duration) {
        warn!(job_id = %self.job_id, kind = err.kind(), error = %err, "Checkpoint poll failed");
        self.metrics.increment(&self.job_id, Counter::PollFailures);
        self.metrics.record_poll_latency(&self.job_id, latency);
    }

    /// Deliver a changed snapshot to the callback
    ///
    /// Errors and panics raised by the callback are logged and counted here
    /// and never reach the scheduling loop.
    pub fn emit(&self, snapshot: ProgressSnapshot) -> Result<(), CallbackError> {
        let facet = CheckpointFacet::from(snapshot);
        info!(
            job_id = %self.job_id,
            total = facet.total,
            completed = facet.completed,
            failed = facet.failed,
            in_progress = facet.in_progress,
            restored = facet.restored,
            "Checkpoint progress changed"
        );
        self.metrics.increment(&self.job_id, Counter::Emitted);

        let result = match catch_unwind(AssertUnwindSafe(|| (self.callback)(&facet))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(report)) => Err(CallbackError::Failed(report)),
            Err(payload) => Err(CallbackError::from_panic(payload)),
        };

        if let Err(e) = &result {
            warn!(job_id = %self.job_id, error = %e, "Checkpoint callback failed");
            self.metrics.increment(&self.job_id, Counter::CallbackFailures);
        }
        result
    }
}
