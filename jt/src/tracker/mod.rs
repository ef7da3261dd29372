//! Continuous checkpoint tracking
//!
//! A [`ContinuousJobTracker`] polls a job's checkpoint counters on a fixed
//! interval and calls back once per change in `total`:
//!
//! - the first successful fetch of a session only sets the baseline
//! - fetch failures are counted and skipped, the baseline survives them
//! - callback failures are counted and logged, the loop keeps going
//! - after `stop_tracking` returns no further callbacks happen

mod config;
mod diff;
mod emitter;
mod error;
mod lifecycle;
mod metrics;
mod scheduler;
mod session;

pub use config::{JOB_ID_PLACEHOLDER, TrackerConfig};
pub use diff::{Baseline, Outcome, evaluate};
pub use emitter::{Emitter, FacetCallback};
pub use error::{CallbackError, TrackerError};
pub use lifecycle::{ContinuousJobTracker, SessionState, TrackingContext};
pub use metrics::{Counter, JobCounters, MetricsSink, TrackerMetrics};
pub use scheduler::{PeriodicTask, ScheduledHandle, Scheduler, StopSignal};
