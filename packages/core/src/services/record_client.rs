//! Record Client
//!
//! Generic CRUD and account operations over an injected [`RecordBackend`].
//!
//! # Result Delivery
//!
//! Every operation is an `async fn` that resolves exactly once with its
//! terminal result. The client does no scheduling of its own: callers that
//! own state on a particular task or thread (e.g. a UI thread) must hand the
//! result over to it themselves.
//!
//! # Failure Policy
//!
//! - `fetch` never fails: unreadable records are logged and skipped
//! - Every other operation returns one [`RecordClientError`]
//! - No retries, no timeouts beyond the backend's own
//!
//! # Examples
//!
//! ```rust,no_run
//! use cloudnotes_core::backend::InMemoryBackend;
//! use cloudnotes_core::models::{Filter, Fruit, SortDescriptor};
//! use cloudnotes_core::services::RecordClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), cloudnotes_core::services::RecordClientError> {
//! let client = RecordClient::new(Arc::new(InMemoryBackend::new()));
//!
//! let kiwi = client.save(Fruit::new("Kiwi", None)).await?;
//! let fruits: Vec<Fruit> = client
//!     .fetch("Fruit", Filter::all().sorted_by(SortDescriptor::ascending("name")))
//!     .await;
//! client.delete(0, &fruits).await?;
//! # let _ = kiwi;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::backend::{Query, RecordBackend};
use crate::config::ClientConfig;
use crate::models::{Filter, Permission, PermissionStatus, RecordModel};
use crate::operations::QueryOperation;
use crate::services::RecordClientError;

/// Generic remote record client
///
/// Holds no mutable state; clones share the same backend session.
#[derive(Clone)]
pub struct RecordClient {
    backend: Arc<dyn RecordBackend>,
    default_results_limit: Option<usize>,
}

impl RecordClient {
    pub fn new(backend: Arc<dyn RecordBackend>) -> Self {
        Self {
            backend,
            default_results_limit: None,
        }
    }

    /// Create a client that applies `config.default_results_limit` to fetches
    /// whose filter carries no limit
    pub fn with_config(backend: Arc<dyn RecordBackend>, config: &ClientConfig) -> Self {
        Self {
            backend,
            default_results_limit: config.default_results_limit,
        }
    }

    pub fn backend(&self) -> &Arc<dyn RecordBackend> {
        &self.backend
    }

    //
    // ACCOUNT OPERATIONS
    //

    /// Check that a usable cloud account is signed in
    ///
    /// # Returns
    ///
    /// - `Ok(true)` when the account is available
    /// - `Err(AccountNotFound)` for no account
    /// - `Err(AccountRestricted)` for a restricted account
    /// - `Err(AccountUnknown)` when the status could not be determined, is
    ///   temporarily unavailable, or is unrecognized
    /// - `Err(Backend(_))` when the backend could not be asked at all
    pub async fn account_status(&self) -> Result<bool, RecordClientError> {
        let status = self.backend.account_status().await?;
        tracing::debug!("Account status: {:?}", status);

        match RecordClientError::from_account_status(status) {
            None => Ok(true),
            Some(error) => Err(error),
        }
    }

    /// Request the user-discoverability permission
    ///
    /// Anything other than a grant, including a backend failure, is reported
    /// as `PermissionNotGranted`.
    pub async fn request_permission(&self) -> Result<bool, RecordClientError> {
        match self
            .backend
            .request_permission(Permission::UserDiscoverability)
            .await
        {
            Ok(PermissionStatus::Granted) => Ok(true),
            Ok(status) => {
                tracing::debug!("Permission not granted: {:?}", status);
                Err(RecordClientError::PermissionNotGranted)
            }
            Err(e) => {
                tracing::warn!("Could not request permission: {}", e);
                Err(RecordClientError::PermissionNotGranted)
            }
        }
    }

    /// Resolve the signed-in user's display name
    ///
    /// Runs two dependent lookups: the user's record ID, then the identity
    /// behind it. The second lookup only runs when the first succeeds.
    pub async fn discover_current_user_identity(&self) -> Result<String, RecordClientError> {
        let user_record_id = self.backend.fetch_user_record_id().await.map_err(|e| {
            tracing::warn!("Could not fetch user record ID: {}", e);
            RecordClientError::CouldNotFetchUserRecordId
        })?;

        let identity = self
            .backend
            .discover_user_identity(&user_record_id)
            .await
            .map_err(|e| {
                tracing::warn!("Could not discover user {}: {}", user_record_id, e);
                RecordClientError::CouldNotDiscoverUser
            })?;

        identity
            .and_then(|identity| identity.given_name)
            .ok_or(RecordClientError::CouldNotDiscoverUser)
    }

    //
    // CRUD OPERATIONS
    //

    /// Fetch records of `record_type` matching `filter`
    ///
    /// Returns models in backend delivery order, which follows the filter's
    /// sort descriptors. Records that fail to load or parse are logged and
    /// skipped; an empty result is an empty list, never an error. Only the
    /// first page of results is returned.
    pub async fn fetch<T: RecordModel>(&self, record_type: &str, filter: Filter) -> Vec<T> {
        let mut query = Query::new(record_type, filter);
        if query.results_limit.is_none() {
            query.results_limit = self.default_results_limit;
        }

        let events = match self.backend.query(query).await {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("Could not start '{}' query: {}", record_type, e);
                return Vec::new();
            }
        };

        let items = QueryOperation::<T>::new(record_type).run(events).await;
        tracing::debug!("Fetched {} '{}' record(s)", items.len(), record_type);
        items
    }

    /// Fetch records of the model's own record type
    pub async fn fetch_all<T: RecordModel>(&self, filter: Filter) -> Vec<T> {
        self.fetch(T::RECORD_TYPE, filter).await
    }

    /// Save a model, returning it wrapped around the confirmed record
    ///
    /// Saving a model whose record already has an ID updates that record.
    ///
    /// # Errors
    ///
    /// `FailedToSave` when the backend rejects the save, confirms a record
    /// without an ID, or confirms a record that no longer reads as `T`.
    pub async fn save<T: RecordModel>(&self, model: T) -> Result<T, RecordClientError> {
        let record = model.into_record();
        let record_type = record.record_type.clone();

        let confirmed = self.backend.save_record(record).await.map_err(|e| {
            tracing::warn!("Failed to save '{}' record: {}", record_type, e);
            RecordClientError::FailedToSave
        })?;

        if !confirmed.is_saved() {
            tracing::warn!(
                "Backend confirmed '{}' record without an identity",
                record_type
            );
            return Err(RecordClientError::FailedToSave);
        }

        T::from_record(confirmed).map_err(|e| {
            tracing::warn!("Confirmed '{}' record is invalid: {}", record_type, e);
            RecordClientError::FailedToSave
        })
    }

    /// Delete the record at `position` in `records`
    ///
    /// # Errors
    ///
    /// - `InvalidPosition` when `position` is out of range (the backend is
    ///   not contacted)
    /// - `FailedToDelete` when the backend does not confirm removal
    pub async fn delete<T: RecordModel>(
        &self,
        position: usize,
        records: &[T],
    ) -> Result<bool, RecordClientError> {
        let model = records.get(position).ok_or_else(|| {
            tracing::debug!(
                "Delete position {} is outside a list of {} record(s)",
                position,
                records.len()
            );
            RecordClientError::invalid_position(position, records.len())
        })?;

        self.delete_model(model).await
    }

    /// Delete the record behind `model`
    ///
    /// # Errors
    ///
    /// `FailedToDelete` when the record was never saved or the backend does
    /// not confirm removal.
    pub async fn delete_model<T: RecordModel>(&self, model: &T) -> Result<bool, RecordClientError> {
        let Some(id) = model.record_id() else {
            tracing::warn!("Cannot delete unsaved '{}' record", T::RECORD_TYPE);
            return Err(RecordClientError::FailedToDelete);
        };

        self.backend.delete_record(id).await.map_err(|e| {
            tracing::warn!("Failed to delete record {}: {}", id, e);
            RecordClientError::FailedToDelete
        })?;

        Ok(true)
    }
}
