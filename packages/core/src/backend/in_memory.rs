//! InMemoryBackend - process-local record store for development and tests.
//!
//! Implements every [`RecordBackend`] capability against a `Vec` of records
//! behind `Arc<RwLock<_>>`. Query results are streamed from a spawned task,
//! one page at a time, the same way a hosted store delivers them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::backend::{BackendError, Query, QueryCursor, QueryEvent, QueryEventStream, RecordBackend};
use crate::config::{ClientConfig, DEFAULT_CONTAINER_IDENTIFIER, DEFAULT_PAGE_SIZE};
use crate::models::{
    compare_records, AccountStatus, Permission, PermissionStatus, Record, RecordId, UserIdentity,
};

/// Capacity of the channel query events are streamed through
const QUERY_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
struct StoredRecord {
    record: Record,
    /// Unreadable records are delivered as per-record errors
    readable: bool,
}

struct BackendState {
    records: Vec<StoredRecord>,
    account_status: AccountStatus,
    permission_status: PermissionStatus,
    current_user: Option<(RecordId, UserIdentity)>,
    reject_saves: bool,
    reject_deletes: bool,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            account_status: AccountStatus::Available,
            permission_status: PermissionStatus::Granted,
            current_user: None,
            reject_saves: false,
            reject_deletes: false,
        }
    }
}

/// In-memory record store.
///
/// Clone-friendly via Arc; clones share storage.
#[derive(Clone)]
pub struct InMemoryBackend {
    container_identifier: String,
    page_size: usize,
    state: Arc<RwLock<BackendState>>,
    identity_lookups: Arc<AtomicUsize>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// Create an empty store with the default page size
    pub fn new() -> Self {
        Self {
            container_identifier: DEFAULT_CONTAINER_IDENTIFIER.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            state: Arc::new(RwLock::new(BackendState::default())),
            identity_lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create an empty store using the container and page size from `config`
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            container_identifier: config.container_identifier.clone(),
            page_size: config.page_size.max(1),
            ..Self::new()
        }
    }

    pub fn container_identifier(&self) -> &str {
        &self.container_identifier
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_account_status(&self, status: AccountStatus) -> Result<(), BackendError> {
        self.write()?.account_status = status;
        Ok(())
    }

    pub fn set_permission_status(&self, status: PermissionStatus) -> Result<(), BackendError> {
        self.write()?.permission_status = status;
        Ok(())
    }

    /// Sign a user in
    pub fn set_current_user(
        &self,
        user_record_id: RecordId,
        identity: UserIdentity,
    ) -> Result<(), BackendError> {
        let identity = identity.with_user_record_id(user_record_id.clone());
        self.write()?.current_user = Some((user_record_id, identity));
        Ok(())
    }

    /// Sign the current user out
    pub fn clear_current_user(&self) -> Result<(), BackendError> {
        self.write()?.current_user = None;
        Ok(())
    }

    /// Make every subsequent save fail
    pub fn reject_saves(&self, reject: bool) -> Result<(), BackendError> {
        self.write()?.reject_saves = reject;
        Ok(())
    }

    /// Make every subsequent delete fail
    pub fn reject_deletes(&self, reject: bool) -> Result<(), BackendError> {
        self.write()?.reject_deletes = reject;
        Ok(())
    }

    /// Store a record that queries will match but cannot read
    pub fn insert_unreadable(&self, mut record: Record) -> Result<RecordId, BackendError> {
        let id = record.id.get_or_insert_with(RecordId::new).clone();
        let now = Utc::now();
        record.created_at = Some(now);
        record.modified_at = Some(now);
        self.write()?.records.push(StoredRecord {
            record,
            readable: false,
        });
        Ok(id)
    }

    /// Number of stored records of every type
    pub fn record_count(&self) -> Result<usize, BackendError> {
        Ok(self.read()?.records.len())
    }

    /// How many identity lookups have been made
    pub fn identity_lookups(&self) -> usize {
        self.identity_lookups.load(Ordering::SeqCst)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BackendState>, BackendError> {
        self.state
            .read()
            .map_err(|_| BackendError::storage("lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BackendState>, BackendError> {
        self.state
            .write()
            .map_err(|_| BackendError::storage("lock poisoned"))
    }

    /// Matching records for one page, plus a cursor when more remain
    fn first_page(&self, query: &Query) -> Result<(Vec<StoredRecord>, Option<QueryCursor>), BackendError> {
        let mut matched: Vec<StoredRecord> = {
            let state = self.read()?;
            state
                .records
                .iter()
                .filter(|stored| {
                    stored.record.record_type == query.record_type
                        && query.predicate.matches(&stored.record)
                })
                .cloned()
                .collect()
        };

        // Stable sort: ties keep insertion order
        matched.sort_by(|a, b| compare_records(&query.sort, &a.record, &b.record));

        let page_len = query
            .results_limit
            .unwrap_or(self.page_size)
            .min(self.page_size);
        let cursor = (matched.len() > page_len).then(|| QueryCursor::new(page_len.to_string()));
        matched.truncate(page_len);

        Ok((matched, cursor))
    }
}

#[async_trait]
impl RecordBackend for InMemoryBackend {
    async fn account_status(&self) -> Result<AccountStatus, BackendError> {
        Ok(self.read()?.account_status)
    }

    async fn request_permission(
        &self,
        permission: Permission,
    ) -> Result<PermissionStatus, BackendError> {
        tracing::debug!("Permission {:?} requested", permission);
        Ok(self.read()?.permission_status)
    }

    async fn fetch_user_record_id(&self) -> Result<RecordId, BackendError> {
        self.read()?
            .current_user
            .as_ref()
            .map(|(id, _)| id.clone())
            .ok_or_else(|| BackendError::unavailable("no user is signed in"))
    }

    async fn discover_user_identity(
        &self,
        user_record_id: &RecordId,
    ) -> Result<Option<UserIdentity>, BackendError> {
        self.identity_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.read()?;
        Ok(state
            .current_user
            .as_ref()
            .filter(|(id, _)| id == user_record_id)
            .map(|(_, identity)| identity.clone()))
    }

    async fn query(&self, query: Query) -> Result<QueryEventStream, BackendError> {
        let (page, cursor) = self.first_page(&query)?;
        tracing::debug!(
            "Query for '{}' in {} matched {} record(s){}",
            query.record_type,
            self.container_identifier,
            page.len(),
            if cursor.is_some() { " (more available)" } else { "" }
        );

        let (tx, rx) = mpsc::channel(QUERY_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            for stored in page {
                let Some(record_id) = stored.record.id.clone() else {
                    continue;
                };
                let result = if stored.readable {
                    Ok(stored.record)
                } else {
                    Err(BackendError::unreadable(
                        record_id.clone(),
                        "record data is unavailable",
                    ))
                };
                if tx
                    .send(QueryEvent::RecordMatched { record_id, result })
                    .await
                    .is_err()
                {
                    // Receiver dropped; nobody is listening any more
                    return;
                }
            }
            let _ = tx.send(QueryEvent::Completed(Ok(cursor))).await;
        });

        Ok(ReceiverStream::new(rx))
    }

    async fn save_record(&self, mut record: Record) -> Result<Record, BackendError> {
        let mut state = self.write()?;
        if state.reject_saves {
            return Err(BackendError::rejected("saves are disabled"));
        }

        let now = Utc::now();
        record.modified_at = Some(now);

        if let Some(id) = record.id.clone() {
            if let Some(existing) = state
                .records
                .iter_mut()
                .find(|stored| stored.record.id.as_ref() == Some(&id))
            {
                if existing.record.record_type != record.record_type {
                    return Err(BackendError::rejected(format!(
                        "record {} is a '{}', not a '{}'",
                        id, existing.record.record_type, record.record_type
                    )));
                }
                record.created_at = existing.record.created_at.or(Some(now));
                existing.record = record.clone();
                existing.readable = true;
                return Ok(record);
            }
        } else {
            record.id = Some(RecordId::new());
        }

        record.created_at = Some(now);
        state.records.push(StoredRecord {
            record: record.clone(),
            readable: true,
        });
        Ok(record)
    }

    async fn delete_record(&self, id: &RecordId) -> Result<RecordId, BackendError> {
        let mut state = self.write()?;
        if state.reject_deletes {
            return Err(BackendError::rejected("deletes are disabled"));
        }

        let position = state
            .records
            .iter()
            .position(|stored| stored.record.id.as_ref() == Some(id))
            .ok_or_else(|| BackendError::record_not_found(id.clone()))?;
        state.records.remove(position);
        Ok(id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Filter, SortDescriptor};
    use tokio_stream::StreamExt;

    fn fruit(name: &str) -> Record {
        let mut record = Record::new("Fruit");
        record.set("name", name);
        record
    }

    async fn collect(backend: &InMemoryBackend, query: Query) -> Vec<QueryEvent> {
        backend.query(query).await.unwrap().collect().await
    }

    #[tokio::test]
    async fn test_save_assigns_identity_and_timestamps() {
        let backend = InMemoryBackend::new();
        let saved = backend.save_record(fruit("Apple")).await.unwrap();

        assert!(saved.id.is_some());
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.modified_at);
        assert_eq!(backend.record_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_existing_id_updates_in_place() {
        let backend = InMemoryBackend::new();
        let saved = backend.save_record(fruit("Apple")).await.unwrap();

        let mut changed = saved.clone();
        changed.set("name", "Apple*");
        let updated = backend.save_record(changed).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.created_at, saved.created_at);
        assert_eq!(updated.get_string("name"), Some("Apple*"));
        assert_eq!(backend.record_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_save_rejects_type_change() {
        let backend = InMemoryBackend::new();
        let saved = backend.save_record(fruit("Apple")).await.unwrap();

        let mut retyped = saved.clone();
        retyped.record_type = "Vegetable".to_string();
        let err = backend.save_record(retyped).await.unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_record() {
        let backend = InMemoryBackend::new();
        let err = backend
            .delete_record(&RecordId::from_name("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_query_streams_matches_then_completion() {
        let backend = InMemoryBackend::new();
        backend.save_record(fruit("Banana")).await.unwrap();
        backend.save_record(fruit("Apple")).await.unwrap();
        backend.save_record(Record::new("Vegetable")).await.unwrap();

        let filter = Filter::all().sorted_by(SortDescriptor::ascending("name"));
        let events = collect(&backend, Query::new("Fruit", filter)).await;

        assert_eq!(events.len(), 3);
        let names: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                QueryEvent::RecordMatched { result: Ok(r), .. } => r.get_string("name"),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Apple", "Banana"]);
        assert_eq!(events[2], QueryEvent::Completed(Ok(None)));
    }

    #[tokio::test]
    async fn test_query_pages_and_reports_cursor() {
        let config = ClientConfig {
            page_size: 2,
            ..Default::default()
        };
        let backend = InMemoryBackend::from_config(&config);
        for name in ["A", "B", "C"] {
            backend.save_record(fruit(name)).await.unwrap();
        }

        let events = collect(&backend, Query::new("Fruit", Filter::all())).await;
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events.last(),
            Some(QueryEvent::Completed(Ok(Some(_))))
        ));

        let limited = collect(&backend, Query::new("Fruit", Filter::all().with_limit(1))).await;
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_records_arrive_as_errors() {
        let backend = InMemoryBackend::new();
        let id = backend.insert_unreadable(fruit("Ghost")).unwrap();

        let events = collect(&backend, Query::new("Fruit", Filter::all())).await;
        match &events[0] {
            QueryEvent::RecordMatched { record_id, result } => {
                assert_eq!(record_id, &id);
                assert!(matches!(result, Err(BackendError::UnreadableRecord { .. })));
            }
            other => panic!("Expected RecordMatched, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clone_shares_storage() {
        let backend = InMemoryBackend::new();
        let clone = backend.clone();

        backend.save_record(fruit("Apple")).await.unwrap();
        assert_eq!(clone.record_count().unwrap(), 1);
    }
}
