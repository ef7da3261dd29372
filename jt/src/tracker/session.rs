//! One tracking session: the fetch, diff, emit tick

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::diff::{Baseline, Outcome};
use super::emitter::Emitter;
use super::scheduler::{PeriodicTask, StopSignal};
use crate::domain::JobId;
use crate::fetcher::SnapshotFetcher;

/// State owned by the scheduler task for the life of a session
///
/// The baseline lives here and nowhere else, so no lock guards it.
pub(crate) struct TrackingSession {
    id: Uuid,
    job_id: JobId,
    fetcher: Arc<dyn SnapshotFetcher>,
    baseline: Baseline,
    emitter: Emitter,
}

impl TrackingSession {
    pub(crate) fn new(id: Uuid, job_id: JobId, fetcher: Arc<dyn SnapshotFetcher>, emitter: Emitter) -> Self {
        debug!(session_id = %id, %job_id, "TrackingSession::new: called");
        Self {
            id,
            job_id,
            fetcher,
            baseline: Baseline::new(),
            emitter,
        }
    }
}

#[async_trait]
impl PeriodicTask for TrackingSession {
    async fn run_tick(&mut self, stop: &StopSignal) {
        self.emitter.record_poll();

        let started = Instant::now();
        let result = self.fetcher.fetch(&self.job_id).await;
        let latency = started.elapsed();

        let snapshot = match result {
            Ok(snapshot) => {
                self.emitter.record_success(latency);
                snapshot
            }
            Err(e) => {
                // Baseline is kept; the next successful fetch diffs against it
                self.emitter.record_failure(&e, latency);
                return;
            }
        };

        if stop.is_requested() {
            debug!(session_id = %self.id, "run_tick: stop requested during fetch, discarding snapshot");
            return;
        }

        match self.baseline.observe(snapshot) {
            Outcome::EstablishBaseline(s) => {
                info!(session_id = %self.id, job_id = %self.job_id, total = s.total, "Checkpoint baseline established");
            }
            Outcome::Unchanged => {
                debug!(session_id = %self.id, total = snapshot.total, "run_tick: checkpoints unchanged");
            }
            Outcome::Changed(s) => match self.emitter.emit(s) {
                Ok(()) => debug!(session_id = %self.id, total = s.total, "run_tick: facet delivered"),
                // already logged and counted; the session carries on
                Err(e) => debug!(session_id = %self.id, error = %e, "run_tick: facet delivery failed"),
            },
        }
    }
}
