//! SnapshotFetcher trait

use async_trait::async_trait;

use super::FetchError;
use crate::domain::{JobId, ProgressSnapshot};

/// One round-trip to the status endpoint for a job
///
/// Implementations must not retry internally. A failed call is retried by
/// the tracker on its next tick.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn fetch(&self, job_id: &JobId) -> Result<ProgressSnapshot, FetchError>;
}
