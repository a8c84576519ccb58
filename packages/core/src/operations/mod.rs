//! Record Operations
//!
//! Helpers the client builds its operations from. `QueryOperation` adapts a
//! backend query's incremental event stream into a single fetch result.

pub mod query_operation;

pub use query_operation::QueryOperation;
