//! Query operation accumulator
//!
//! Turns the incremental delivery of a backend query (one event per matched
//! record, then a single completion event) into one complete, ordered list of
//! typed models.
//!
//! # State Machine
//!
//! - **Accumulating**: each successfully parsed record is appended in delivery
//!   order; unreadable or unparseable records are logged and dropped
//! - **Done**: entered on the completion event, which yields the accumulated
//!   list exactly once; later events are ignored
//!
//! Continuation cursors are never followed: callers get the first page only.

use crate::backend::{BackendError, QueryEvent};
use crate::models::{Record, RecordId, RecordModel};
use tokio_stream::{Stream, StreamExt};

enum QueryState<T> {
    Accumulating(Vec<T>),
    Done,
}

/// Single-shot accumulator for one query
pub struct QueryOperation<T: RecordModel> {
    record_type: String,
    state: QueryState<T>,
}

impl<T: RecordModel> QueryOperation<T> {
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            state: QueryState::Accumulating(Vec::new()),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, QueryState::Done)
    }

    /// Number of models accumulated so far
    pub fn accumulated(&self) -> usize {
        match &self.state {
            QueryState::Accumulating(items) => items.len(),
            QueryState::Done => 0,
        }
    }

    /// Feed one event
    ///
    /// Returns the accumulated models when `event` is the completion signal,
    /// `None` otherwise (including every event after completion).
    pub fn handle(&mut self, event: QueryEvent) -> Option<Vec<T>> {
        match event {
            QueryEvent::RecordMatched { record_id, result } => {
                self.accept(record_id, result);
                None
            }
            QueryEvent::Completed(outcome) => {
                if self.is_done() {
                    tracing::debug!(
                        "Ignoring duplicate completion for '{}' query",
                        self.record_type
                    );
                    return None;
                }
                match outcome {
                    Ok(Some(cursor)) => tracing::debug!(
                        "'{}' query has more results past cursor {}; returning first page",
                        self.record_type,
                        cursor.as_str()
                    ),
                    Ok(None) => {}
                    Err(e) => tracing::warn!(
                        "'{}' query finished with error: {}",
                        self.record_type,
                        e
                    ),
                }
                Some(self.finish())
            }
        }
    }

    /// Drive the operation to completion over an event stream
    ///
    /// Always yields exactly one list. If the stream ends without a
    /// completion event, whatever was accumulated is returned.
    pub async fn run<S>(mut self, mut events: S) -> Vec<T>
    where
        S: Stream<Item = QueryEvent> + Unpin,
    {
        while let Some(event) = events.next().await {
            if let Some(items) = self.handle(event) {
                return items;
            }
        }

        tracing::warn!(
            "'{}' query ended without a completion signal; returning {} accumulated record(s)",
            self.record_type,
            self.accumulated()
        );
        self.finish()
    }

    fn accept(&mut self, record_id: RecordId, result: Result<Record, BackendError>) {
        let QueryState::Accumulating(items) = &mut self.state else {
            tracing::debug!(
                "Ignoring record {} delivered after '{}' query completed",
                record_id,
                self.record_type
            );
            return;
        };

        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(|record| T::from_record(record).map_err(|e| e.to_string()));

        match parsed {
            Ok(item) => items.push(item),
            Err(reason) => tracing::warn!(
                "Skipping '{}' record {}: {}",
                self.record_type,
                record_id,
                reason
            ),
        }
    }

    fn finish(&mut self) -> Vec<T> {
        match std::mem::replace(&mut self.state, QueryState::Done) {
            QueryState::Accumulating(items) => items,
            QueryState::Done => Vec::new(),
        }
    }
}
