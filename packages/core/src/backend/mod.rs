//! Backend Layer
//!
//! This module defines how the client talks to the hosted record store:
//!
//! - `RecordBackend` - async trait covering queries, saves, deletes and
//!   account/permission/identity lookups
//! - `QueryEvent` - incremental query delivery (matches, then one completion)
//! - `InMemoryBackend` - complete in-process implementation
//!
//! The backend session is always injected; nothing in this crate reaches for
//! a process-wide default container.

mod error;
mod in_memory;
mod record_backend;

pub use error::BackendError;
pub use in_memory::InMemoryBackend;
pub use record_backend::{Query, QueryCursor, QueryEvent, QueryEventStream, RecordBackend};
