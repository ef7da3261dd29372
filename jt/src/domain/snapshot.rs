//! Checkpoint progress snapshot and the facet emitted for it

use serde::{Deserialize, Serialize};

/// Point-in-time read of a job's checkpoint counters
///
/// No relationship between the fields is assumed. In particular `total` is
/// not required to equal the sum of the others; it is only treated as the
/// authoritative progress counter for change detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub completed: u64,
    pub failed: u64,
    pub in_progress: u64,
    pub restored: u64,
    pub total: u64,
}

impl ProgressSnapshot {
    pub fn new(completed: u64, failed: u64, in_progress: u64, restored: u64, total: u64) -> Self {
        Self {
            completed,
            failed,
            in_progress,
            restored,
            total,
        }
    }

    /// Whether `other` counts as progress relative to this snapshot
    pub fn total_differs(&self, other: &ProgressSnapshot) -> bool {
        self.total != other.total
    }
}

/// Record delivered to the tracking callback when progress changes
///
/// A straight copy of the snapshot's counters; it is emitted in full, never
/// as a delta against the previous baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointFacet {
    pub completed: u64,
    pub failed: u64,
    pub in_progress: u64,
    pub restored: u64,
    pub total: u64,
}

impl CheckpointFacet {
    pub fn new(completed: u64, failed: u64, in_progress: u64, restored: u64, total: u64) -> Self {
        Self {
            completed,
            failed,
            in_progress,
            restored,
            total,
        }
    }
}

impl From<ProgressSnapshot> for CheckpointFacet {
    fn from(s: ProgressSnapshot) -> Self {
        Self {
            completed: s.completed,
            failed: s.failed,
            in_progress: s.in_progress,
            restored: s.restored,
            total: s.total,
        }
    }
}
