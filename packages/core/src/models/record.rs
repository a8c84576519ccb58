//! Record Data Structures
//!
//! This module defines the generic `Record` struct that every remote document
//! is stored as, together with its identifier and field value types.
//!
//! # Architecture
//!
//! - **Universal Record**: A single struct represents every record type
//! - **Field Map**: Entity data lives in `fields`, keyed by field name
//! - **Backend Identity**: `id` stays `None` until the backend confirms a save
//!
//! # Examples
//!
//! ```rust
//! use cloudnotes_core::models::{FieldValue, Record};
//!
//! let mut record = Record::new("Fruit");
//! record.set("name", "Apple");
//!
//! assert!(!record.is_saved());
//! assert_eq!(record.get_string("name"), Some("Apple"));
//! assert_eq!(record.get("name"), Some(&FieldValue::String("Apple".to_string())));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Validation errors raised while reading a model out of a `Record`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid record type: expected '{expected}', got '{actual}'")]
    InvalidRecordType { expected: String, actual: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field '{field}' does not hold a {expected} value")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
    },
}

/// Backend-assigned record identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh UUID-based identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Use an explicit record name (e.g. the well-known user record name)
    pub fn from_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a binary asset stored out-of-band
///
/// The client never reads the bytes behind `file_url`; callers resolve and
/// cache the file before attaching it to a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRef {
    pub file_url: Url,
}

impl AssetRef {
    pub fn new(file_url: Url) -> Self {
        Self { file_url }
    }
}

/// A single value in a record's field map
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    String(String),
    Asset(AssetRef),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Asset(_) => None,
        }
    }

    pub fn as_asset(&self) -> Option<&AssetRef> {
        match self {
            Self::Asset(asset) => Some(asset),
            Self::String(_) => None,
        }
    }

    /// Name of the value kind, used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Asset(_) => "asset",
        }
    }

    /// Text used when comparing or sorting values (assets compare by URL)
    pub fn comparable_text(&self) -> &str {
        match self {
            Self::String(value) => value,
            Self::Asset(asset) => asset.file_url.as_str(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<AssetRef> for FieldValue {
    fn from(asset: AssetRef) -> Self {
        Self::Asset(asset)
    }
}

/// Generic remote record.
///
/// # Fields
///
/// - `id`: Backend identity, `None` until the first successful save
/// - `record_type`: Type tag (e.g. "Fruit")
/// - `fields`: Field name to value mapping
/// - `created_at` / `modified_at`: Backend timestamps, `None` while unsaved
///
/// Updating a record means saving it again with the same `id` and changed
/// fields; the backend never mutates records on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Backend identity (absent while unsaved)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Record type tag
    pub record_type: String,

    /// All entity-specific fields
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,

    /// Creation timestamp assigned by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last modification timestamp assigned by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Record {
    /// Create a fresh, unsaved record of the given type
    pub fn new(record_type: impl Into<String>) -> Self {
        Self {
            id: None,
            record_type: record_type.into(),
            fields: BTreeMap::new(),
            created_at: None,
            modified_at: None,
        }
    }

    /// Create a record that already carries an identity
    ///
    /// Saving it upserts the record with that identity.
    pub fn with_id(id: RecordId, record_type: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            ..Self::new(record_type)
        }
    }

    /// Whether the backend has confirmed this record at least once
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn get_string(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn get_asset(&self, field: &str) -> Option<&AssetRef> {
        self.get(field).and_then(FieldValue::as_asset)
    }

    /// Set a field, returning the previous value if any
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    /// Check the record's type tag
    pub fn ensure_type(&self, expected: &str) -> Result<(), ValidationError> {
        if self.record_type != expected {
            return Err(ValidationError::InvalidRecordType {
                expected: expected.to_string(),
                actual: self.record_type.clone(),
            });
        }
        Ok(())
    }

    /// Check that a field, when present, holds a string
    pub fn ensure_string(&self, field: &str) -> Result<(), ValidationError> {
        match self.get(field) {
            Some(value) if value.as_str().is_none() => Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                expected: "string",
            }),
            _ => Ok(()),
        }
    }

    /// Check that a field, when present, holds an asset reference
    pub fn ensure_asset(&self, field: &str) -> Result<(), ValidationError> {
        match self.get(field) {
            Some(value) if value.as_asset().is_none() => Err(ValidationError::InvalidFieldType {
                field: field.to_string(),
                expected: "asset",
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_unsaved() {
        let record = Record::new("Fruit");

        assert!(!record.is_saved());
        assert!(record.fields.is_empty());
        assert!(record.created_at.is_none());
        assert!(record.modified_at.is_none());
    }

    #[test]
    fn test_record_with_id_is_saved() {
        let id = RecordId::from_name("fruit-1");
        let record = Record::with_id(id.clone(), "Fruit");

        assert!(record.is_saved());
        assert_eq!(record.id, Some(id));
    }

    #[test]
    fn test_field_accessors() {
        let url = Url::parse("file:///tmp/apple.jpg").unwrap();
        let mut record = Record::new("Fruit");
        record.set("name", "Apple");
        record.set("image", AssetRef::new(url.clone()));

        assert_eq!(record.get_string("name"), Some("Apple"));
        assert_eq!(record.get_asset("name"), None);
        assert_eq!(record.get_asset("image").map(|a| &a.file_url), Some(&url));
        assert_eq!(record.get_string("image"), None);

        let previous = record.set("name", "Pear");
        assert_eq!(previous, Some(FieldValue::from("Apple")));
        assert_eq!(record.remove("name"), Some(FieldValue::from("Pear")));
        assert!(record.get("name").is_none());
    }

    #[test]
    fn test_ensure_type() {
        let record = Record::new("Fruit");

        assert!(record.ensure_type("Fruit").is_ok());
        assert!(matches!(
            record.ensure_type("Vegetable"),
            Err(ValidationError::InvalidRecordType { .. })
        ));
    }

    #[test]
    fn test_ensure_field_types() {
        let url = Url::parse("file:///tmp/apple.jpg").unwrap();
        let mut record = Record::new("Fruit");

        // Missing fields pass both checks
        assert!(record.ensure_string("name").is_ok());
        assert!(record.ensure_asset("image").is_ok());

        record.set("name", AssetRef::new(url));
        record.set("image", "not an asset");

        assert_eq!(
            record.ensure_string("name"),
            Err(ValidationError::InvalidFieldType {
                field: "name".to_string(),
                expected: "string",
            })
        );
        assert!(record.ensure_asset("image").is_err());
    }

    #[test]
    fn test_record_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
        assert_eq!(RecordId::from_name("abc").to_string(), "abc");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let mut record = Record::with_id(RecordId::from_name("r-1"), "Fruit");
        record.set("name", "Apple");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "r-1");
        assert_eq!(json["recordType"], "Fruit");
        assert_eq!(json["fields"]["name"]["type"], "string");
        assert_eq!(json["fields"]["name"]["value"], "Apple");
        assert!(json.get("createdAt").is_none());
    }
}
