//! FacetRecord - a facet with delivery metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SinkError;
use crate::domain::{CheckpointFacet, JobId};

/// A checkpoint facet stamped with the job and emission time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetRecord {
    pub job_id: JobId,
    pub emitted_at: DateTime<Utc>,
    pub checkpoints: CheckpointFacet,
}

impl FacetRecord {
    pub fn new(job_id: JobId, checkpoints: CheckpointFacet) -> Self {
        Self {
            job_id,
            emitted_at: Utc::now(),
            checkpoints,
        }
    }

    pub fn to_payload(&self) -> Result<Value, SinkError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let record = FacetRecord::new(JobId::new("job-1"), CheckpointFacet::new(1, 5, 6, 7, 1));
        let payload = record.to_payload().unwrap();

        assert_eq!(payload["job_id"], "job-1");
        assert_eq!(payload["checkpoints"]["total"], 1);
        assert_eq!(payload["checkpoints"]["restored"], 7);
        assert!(payload["emitted_at"].is_string());
    }
}
