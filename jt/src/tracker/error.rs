//! Tracker error types

use thiserror::Error;
use uuid::Uuid;

use crate::domain::JobId;

/// Errors returned by the tracker lifecycle
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Already tracking job {job_id} (session {session_id})")]
    AlreadyTracking { job_id: JobId, session_id: Uuid },

    #[error("Invalid tracker configuration: {0}")]
    InvalidConfig(String),
}

/// Failure raised by a tracking callback
///
/// Never propagated: the emitter logs and counts it, then carries on.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("Callback failed: {0}")]
    Failed(eyre::Report),

    #[error("Callback panicked: {0}")]
    Panicked(String),
}

impl CallbackError {
    /// Build from the payload of a caught panic
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        CallbackError::Panicked(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_tracking_message() {
        let session_id = Uuid::nil();
        let err = TrackerError::AlreadyTracking {
            job_id: JobId::new("job-1"),
            session_id,
        };
        assert_eq!(
            err.to_string(),
            "Already tracking job job-1 (session 00000000-0000-0000-0000-000000000000)"
        );
    }

    #[test]
    fn test_panic_payloads() {
        let err = CallbackError::from_panic(Box::new("boom"));
        assert_eq!(err.to_string(), "Callback panicked: boom");

        let err = CallbackError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(err.to_string(), "Callback panicked: owned boom");

        let err = CallbackError::from_panic(Box::new(7_u32));
        assert_eq!(err.to_string(), "Callback panicked: non-string panic payload");
    }
}
