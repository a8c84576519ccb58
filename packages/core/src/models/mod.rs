//! Data Models
//!
//! This module contains the data structures shared by the client and its
//! backends:
//!
//! - `Record` - Universal remote record (ID, type tag, field map)
//! - `RecordModel` - Contract for typed views over a record
//! - `Fruit` - The fruit domain model
//! - `Filter` - Predicate, ordering and limit for fetches
//! - Account, permission and user identity status types

mod account;
mod filter;
mod fruit;
mod record;
mod record_model;

pub use account::{AccountStatus, Permission, PermissionStatus, UserIdentity};
pub use filter::{
    compare_records, Filter, FilterOperator, Predicate, SortDescriptor, SortDirection,
};
pub use fruit::{Fruit, FRUIT_RECORD_TYPE};
pub use record::{AssetRef, FieldValue, Record, RecordId, ValidationError};
pub use record_model::RecordModel;
