//! jobtracker - continuous checkpoint progress tracking for streaming jobs
//!
//! A tracker polls a job engine's checkpoint status endpoint on a fixed
//! interval and reports exactly one facet per genuine change in progress,
//! riding out transient endpoint failures without losing its baseline.
//!
//! # Modules
//!
//! - [`tracker`] - scheduler, change detection, emission and lifecycle
//! - [`fetcher`] - checkpoint snapshot fetching over HTTP
//! - [`sink`] - delivery of emitted facets (console, HTTP, transform)
//! - [`domain`] - snapshot, facet and job id types
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod fetcher;
pub mod sink;
pub mod tracker;

// Re-export commonly used types
pub use config::Config;
pub use domain::{CheckpointFacet, JobId, ProgressSnapshot};
pub use fetcher::{FetchError, HttpSnapshotFetcher, SnapshotFetcher};
pub use sink::{FacetRecord, FacetSink, SinkConfig, SinkError};
pub use tracker::{
    CallbackError, ContinuousJobTracker, Counter, JobCounters, MetricsSink, Outcome, SessionState, TrackerConfig,
    TrackerError, TrackerMetrics, TrackingContext,
};
