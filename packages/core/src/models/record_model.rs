//! Record Model Contract
//!
//! Domain types (e.g. [`Fruit`](crate::models::Fruit)) are typed views over a
//! universal [`Record`]. The client's CRUD operations are generic over this
//! trait, so any domain type that implements it can be fetched, saved and
//! deleted without further plumbing.

use crate::models::{Record, RecordId, ValidationError};
use std::hash::Hash;

/// Typed view over a remote [`Record`]
///
/// Implementors exclusively own their record. Equality and hashing follow the
/// underlying record, which is what list-diffing consumers compare on.
///
/// # Examples
///
/// ```rust
/// use cloudnotes_core::models::{Record, RecordModel, ValidationError};
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Note {
///     record: Record,
/// }
///
/// impl RecordModel for Note {
///     const RECORD_TYPE: &'static str = "Note";
///
///     fn from_record(record: Record) -> Result<Self, ValidationError> {
///         record.ensure_type(Self::RECORD_TYPE)?;
///         Ok(Self { record })
///     }
///
///     fn record(&self) -> &Record {
///         &self.record
///     }
///
///     fn record_mut(&mut self) -> &mut Record {
///         &mut self.record
///     }
///
///     fn into_record(self) -> Record {
///         self.record
///     }
/// }
///
/// let note = Note::from_record(Record::new("Note")).unwrap();
/// assert!(note.record_id().is_none());
/// ```
pub trait RecordModel: Clone + Eq + Hash + Send + Sync + 'static {
    /// Record type tag this model reads and writes
    const RECORD_TYPE: &'static str;

    /// Materialize the model from an existing record
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the record's type or field value kinds
    /// do not match the model.
    fn from_record(record: Record) -> Result<Self, ValidationError>;

    /// Underlying record
    fn record(&self) -> &Record;

    /// Mutable access to the underlying record
    fn record_mut(&mut self) -> &mut Record;

    /// Consume the model, returning its record
    fn into_record(self) -> Record;

    /// Backend identity of the underlying record, if it has been saved
    fn record_id(&self) -> Option<&RecordId> {
        self.record().id.as_ref()
    }
}
