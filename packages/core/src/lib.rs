//! Cloud Notes Core - Remote Record Client
//!
//! This crate provides typed CRUD access to records in a hosted document
//! store, plus account, permission and user identity checks.
//!
//! # Architecture
//!
//! - **Universal Record**: Every stored entity is a `Record` (ID, type tag, field map)
//! - **Typed Models**: Domain types implement `RecordModel` to view a record
//! - **Injected Backend**: The store is an `Arc<dyn RecordBackend>`, never a global
//! - **Single Result**: Each operation resolves exactly once
//!
//! # Modules
//!
//! - [`models`] - Records, the `RecordModel` contract, `Fruit`, filters, status types
//! - [`backend`] - `RecordBackend` trait and the in-memory implementation
//! - [`operations`] - Query accumulation used by fetch
//! - [`services`] - `RecordClient` and its error taxonomy
//! - [`config`] - Client configuration

pub mod backend;
pub mod config;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use backend::{BackendError, InMemoryBackend, RecordBackend};
pub use config::ClientConfig;
pub use models::*;
pub use services::*;
