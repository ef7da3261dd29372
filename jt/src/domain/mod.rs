//! Domain types shared by the fetcher, tracker and sinks

mod job_id;
mod snapshot;

pub use job_id::JobId;
pub use snapshot::{CheckpointFacet, ProgressSnapshot};
