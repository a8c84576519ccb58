//! RecordBackend Trait - Remote Store Abstraction
//!
//! This module defines the `RecordBackend` trait: the capabilities the client
//! needs from a hosted document store. The backend session is passed to the
//! client explicitly, so tests and the demo can run against
//! [`InMemoryBackend`](super::InMemoryBackend) instead of a network service.
//!
//! # Query Delivery
//!
//! Queries do not return a list. They return a stream of [`QueryEvent`]s:
//! one `RecordMatched` per matched record (a record, or a per-record error),
//! followed by exactly one `Completed`. Turning this into a single result is
//! the job of [`QueryOperation`](crate::operations::QueryOperation).

use crate::backend::BackendError;
use crate::models::{
    AccountStatus, Filter, Permission, PermissionStatus, Predicate, Record, RecordId,
    SortDescriptor, UserIdentity,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;

/// Event stream returned by [`RecordBackend::query`]
pub type QueryEventStream = ReceiverStream<QueryEvent>;

/// Opaque continuation token for results past the first page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryCursor(String);

impl QueryCursor {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Query submitted to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub record_type: String,
    pub predicate: Predicate,
    pub sort: Vec<SortDescriptor>,
    pub results_limit: Option<usize>,
}

impl Query {
    pub fn new(record_type: impl Into<String>, filter: Filter) -> Self {
        Self {
            record_type: record_type.into(),
            predicate: filter.predicate,
            sort: filter.sort,
            results_limit: filter.limit,
        }
    }
}

/// Incremental query delivery
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    /// One matched record, or the error reading it
    RecordMatched {
        record_id: RecordId,
        result: Result<Record, BackendError>,
    },

    /// Query finished; carries a cursor when more results remain
    Completed(Result<Option<QueryCursor>, BackendError>),
}

/// Abstraction over the hosted record store
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the client holds them as
/// `Arc<dyn RecordBackend>` and may call them from any task.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Account status of the current device
    async fn account_status(&self) -> Result<AccountStatus, BackendError>;

    /// Ask the user for an application permission
    async fn request_permission(
        &self,
        permission: Permission,
    ) -> Result<PermissionStatus, BackendError>;

    /// Record ID of the signed-in user
    async fn fetch_user_record_id(&self) -> Result<RecordId, BackendError>;

    /// Look up the identity behind a user record ID
    ///
    /// Returns `Ok(None)` when the user is not discoverable.
    async fn discover_user_identity(
        &self,
        user_record_id: &RecordId,
    ) -> Result<Option<UserIdentity>, BackendError>;

    /// Start a query
    ///
    /// Events are delivered on the returned stream; the stream ends after
    /// `QueryEvent::Completed`.
    async fn query(&self, query: Query) -> Result<QueryEventStream, BackendError>;

    /// Upsert a record by identity, returning the confirmed record
    ///
    /// Unsaved records are assigned an ID. A confirmed record always has one.
    async fn save_record(&self, record: Record) -> Result<Record, BackendError>;

    /// Delete a record by ID, returning the deleted ID
    async fn delete_record(&self, id: &RecordId) -> Result<RecordId, BackendError>;
}
