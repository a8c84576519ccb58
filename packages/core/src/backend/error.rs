//! Backend Error Types
//!
//! Errors reported by [`RecordBackend`](super::RecordBackend) implementations.
//! The client maps these onto its own taxonomy; most are logged and collapsed.

use crate::models::RecordId;
use thiserror::Error;

/// Backend operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Service could not be reached or has no usable session
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// No record with this ID exists
    #[error("Record not found: {id}")]
    RecordNotFound { id: RecordId },

    /// A matched record could not be read
    #[error("Record {id} could not be read: {reason}")]
    UnreadableRecord { id: RecordId, reason: String },

    /// Backend refused the operation
    #[error("Operation rejected: {0}")]
    Rejected(String),

    /// Storage-level failure
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BackendError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn record_not_found(id: RecordId) -> Self {
        Self::RecordNotFound { id }
    }

    pub fn unreadable(id: RecordId, reason: impl Into<String>) -> Self {
        Self::UnreadableRecord {
            id,
            reason: reason.into(),
        }
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
