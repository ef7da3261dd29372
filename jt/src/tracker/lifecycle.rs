//! ContinuousJobTracker - start/stop lifecycle of checkpoint tracking

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::config::TrackerConfig;
use super::emitter::{Emitter, FacetCallback};
use super::error::TrackerError;
use super::metrics::{MetricsSink, TrackerMetrics};
use super::scheduler::{ScheduledHandle, Scheduler};
use super::session::TrackingSession;
use crate::domain::{CheckpointFacet, JobId};
use crate::fetcher::{FetchError, HttpSnapshotFetcher, SnapshotFetcher};

/// Lifecycle state of a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Running => write!(f, "running"),
            SessionState::Stopped => write!(f, "stopped"),
        }
    }
}

/// What a tracking session needs from the job it belongs to
#[derive(Clone)]
pub struct TrackingContext {
    pub job_id: JobId,
    pub metrics: Arc<dyn MetricsSink>,
}

impl TrackingContext {
    /// Context with a private in-memory metrics sink
    pub fn new(job_id: impl Into<JobId>) -> Self {
        Self {
            job_id: job_id.into(),
            metrics: Arc::new(TrackerMetrics::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }
}

struct ActiveSession {
    id: Uuid,
    job_id: JobId,
    handle: ScheduledHandle,
}

enum Slot {
    Idle,
    Running(ActiveSession),
    Stopped,
}

/// Polls a job's checkpoint counters and reports every change
///
/// A tracker follows one job per session. It can be started and stopped any
/// number of times; each start begins with an empty baseline.
pub struct ContinuousJobTracker {
    config: TrackerConfig,
    fetcher: Arc<dyn SnapshotFetcher>,
    // Held across a whole start or stop so they never interleave
    transition: Mutex<()>,
    // Held only briefly; state queries never wait on a stopping session
    slot: Mutex<Slot>,
}

impl ContinuousJobTracker {
    /// Create a tracker with a custom fetcher
    pub fn new(config: TrackerConfig, fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        debug!(poll_interval_ms = config.poll_interval_ms, "ContinuousJobTracker::new: called");
        Self {
            config,
            fetcher,
            transition: Mutex::new(()),
            slot: Mutex::new(Slot::Idle),
        }
    }

    /// Create a tracker polling the HTTP endpoint from `config`
    pub fn from_config(config: TrackerConfig) -> Result<Self, FetchError> {
        let fetcher = HttpSnapshotFetcher::from_config(&config)?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Start polling for `context.job_id`
    ///
    /// Returns the new session id. Fails with `AlreadyTracking` if a session
    /// is running; the running session is left untouched. Fails with
    /// `InvalidConfig` before anything is spawned if the config cannot run.
    pub async fn start_tracking<F>(&self, context: TrackingContext, callback: F) -> Result<Uuid, TrackerError>
    where
        F: Fn(&CheckpointFacet) -> eyre::Result<()> + Send + Sync + 'static,
    {
        debug!(job_id = %context.job_id, "ContinuousJobTracker::start_tracking: called");
        self.start_with_callback(context, Arc::new(callback)).await
    }

    /// Start polling with an already shared callback
    pub async fn start_with_callback(
        &self,
        context: TrackingContext,
        callback: FacetCallback,
    ) -> Result<Uuid, TrackerError> {
        self.config.validate()?;

        let _transition = self.transition.lock().await;
        let mut slot = self.slot.lock().await;
        if let Slot::Running(active) = &*slot {
            debug!(session_id = %active.id, "start_with_callback: already running");
            return Err(TrackerError::AlreadyTracking {
                job_id: active.job_id.clone(),
                session_id: active.id,
            });
        }

        let id = Uuid::now_v7();
        let TrackingContext { job_id, metrics } = context;
        let emitter = Emitter::new(job_id.clone(), callback, metrics);
        let session = TrackingSession::new(id, job_id.clone(), self.fetcher.clone(), emitter);
        let handle = Scheduler::start(self.config.poll_interval(), session);

        info!(
            session_id = %id,
            %job_id,
            interval_ms = self.config.poll_interval_ms,
            endpoint = %self.config.endpoint_for(&job_id),
            "Checkpoint tracking started"
        );
        *slot = Slot::Running(ActiveSession { id, job_id, handle });
        Ok(id)
    }

    /// Stop the running session, if any
    ///
    /// Always safe to call. Once this returns no further callbacks are made
    /// and the session's baseline is gone.
    pub async fn stop_tracking(&self) {
        debug!("ContinuousJobTracker::stop_tracking: called");
        let _transition = self.transition.lock().await;
        let previous = std::mem::replace(&mut *self.slot.lock().await, Slot::Stopped);

        let Slot::Running(active) = previous else {
            debug!("stop_tracking: no running session");
            return;
        };

        active.handle.stop(self.config.stop_grace()).await;
        info!(session_id = %active.id, job_id = %active.job_id, "Checkpoint tracking stopped");
    }

    pub async fn state(&self) -> SessionState {
        match &*self.slot.lock().await {
            Slot::Idle => SessionState::Idle,
            Slot::Running(_) => SessionState::Running,
            Slot::Stopped => SessionState::Stopped,
        }
    }

    /// Id of the running session
    pub async fn session_id(&self) -> Option<Uuid> {
        match &*self.slot.lock().await {
            Slot::Running(active) => Some(active.id),
            _ => None,
        }
    }
}
