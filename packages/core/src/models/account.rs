//! Account, permission and user identity types reported by the backend.

use crate::models::RecordId;
use serde::{Deserialize, Serialize};

/// Cloud account status of the current device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Available,
    NoAccount,
    Restricted,
    CouldNotDetermine,
    TemporarilyUnavailable,
    /// Status value this client does not recognize
    Unknown,
}

/// Outcome of an application permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    CouldNotComplete,
    /// Permission has not been requested yet
    Initial,
    Unknown,
}

/// Application permissions that can be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Lets other users look up this user by identity
    UserDiscoverability,
}

/// Identity of a discovered user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_record_id: Option<RecordId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
}

impl UserIdentity {
    pub fn new(given_name: Option<&str>, family_name: Option<&str>) -> Self {
        Self {
            user_record_id: None,
            given_name: given_name.map(str::to_string),
            family_name: family_name.map(str::to_string),
        }
    }

    pub fn with_user_record_id(mut self, id: RecordId) -> Self {
        self.user_record_id = Some(id);
        self
    }
}
