//! Service Layer Error Types
//!
//! The error taxonomy surfaced by [`RecordClient`](super::RecordClient). Each
//! kind is distinct and stable so presentation code can render it as a
//! message without inspecting backend details.

use crate::backend::BackendError;
use crate::models::AccountStatus;
use thiserror::Error;

/// Record client errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordClientError {
    /// No cloud account is signed in on this device
    #[error("No cloud account found. Sign in to use cloud storage.")]
    AccountNotFound,

    /// Account access is restricted (e.g. parental controls)
    #[error("Cloud account access is restricted")]
    AccountRestricted,

    /// Account status could not be determined or is unrecognized
    #[error("Cloud account status is unknown")]
    AccountUnknown,

    #[error("Permission was not granted")]
    PermissionNotGranted,

    #[error("Could not fetch the current user's record ID")]
    CouldNotFetchUserRecordId,

    #[error("Could not discover the current user's identity")]
    CouldNotDiscoverUser,

    #[error("Failed to save record")]
    FailedToSave,

    #[error("Failed to delete record")]
    FailedToDelete,

    /// Delete was addressed to a position outside the supplied list
    #[error("No record at position {position} (list has {len} record(s))")]
    InvalidPosition { position: usize, len: usize },

    /// Backend failed before it could report an account status
    #[error("Backend operation failed: {0}")]
    Backend(#[from] BackendError),
}

impl RecordClientError {
    /// Create an invalid position error
    pub fn invalid_position(position: usize, len: usize) -> Self {
        Self::InvalidPosition { position, len }
    }

    /// Error kind for a non-available account status, `None` when available
    pub fn from_account_status(status: AccountStatus) -> Option<Self> {
        match status {
            AccountStatus::Available => None,
            AccountStatus::NoAccount => Some(Self::AccountNotFound),
            AccountStatus::Restricted => Some(Self::AccountRestricted),
            AccountStatus::CouldNotDetermine
            | AccountStatus::TemporarilyUnavailable
            | AccountStatus::Unknown => Some(Self::AccountUnknown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_status_mapping() {
        assert_eq!(
            RecordClientError::from_account_status(AccountStatus::Available),
            None
        );
        assert_eq!(
            RecordClientError::from_account_status(AccountStatus::NoAccount),
            Some(RecordClientError::AccountNotFound)
        );
        assert_eq!(
            RecordClientError::from_account_status(AccountStatus::Restricted),
            Some(RecordClientError::AccountRestricted)
        );
        for status in [
            AccountStatus::CouldNotDetermine,
            AccountStatus::TemporarilyUnavailable,
            AccountStatus::Unknown,
        ] {
            assert_eq!(
                RecordClientError::from_account_status(status),
                Some(RecordClientError::AccountUnknown)
            );
        }
    }

    #[test]
    fn test_messages_are_distinct() {
        let errors = [
            RecordClientError::AccountNotFound,
            RecordClientError::AccountRestricted,
            RecordClientError::AccountUnknown,
            RecordClientError::PermissionNotGranted,
            RecordClientError::CouldNotFetchUserRecordId,
            RecordClientError::CouldNotDiscoverUser,
            RecordClientError::FailedToSave,
            RecordClientError::FailedToDelete,
            RecordClientError::invalid_position(3, 1),
        ];
        let messages: std::collections::HashSet<String> =
            errors.iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), errors.len());
        assert_eq!(
            RecordClientError::invalid_position(3, 1).to_string(),
            "No record at position 3 (list has 1 record(s))"
        );
    }
}
