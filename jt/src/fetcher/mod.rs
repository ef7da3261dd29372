//! Snapshot fetching from the job engine's checkpoint status endpoint
//!
//! The tracker only sees the [`SnapshotFetcher`] trait. Every failure, be it
//! transport, status code or body, is a single [`FetchError`] because the
//! recovery is always the same: skip the tick and try again on the next one.

mod client;
mod error;
mod http;

pub use client::SnapshotFetcher;
pub use error::FetchError;
pub use http::{HttpSnapshotFetcher, parse_checkpoint_counts};
