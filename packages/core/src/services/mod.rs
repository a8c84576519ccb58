//! Client Services
//!
//! - `RecordClient` - account checks, identity discovery and generic CRUD
//! - `RecordClientError` - the client's error taxonomy

pub mod error;
pub mod record_client;

pub use error::RecordClientError;
pub use record_client::RecordClient;
