//! Type-Safe Fruit Model
//!
//! Provides the `Fruit` domain model on top of the universal `Record` storage
//! model. A fruit has a `name` string field and an optional `image` asset.
//!
//! # Examples
//!
//! ```rust
//! use cloudnotes_core::models::{Fruit, RecordModel};
//! use url::Url;
//!
//! let image = Url::parse("file:///tmp/kiwi.jpg").unwrap();
//! let fruit = Fruit::new("Kiwi", Some(image.clone()));
//!
//! assert_eq!(fruit.name(), "Kiwi");
//! assert_eq!(fruit.image_url(), Some(&image));
//! assert!(fruit.record_id().is_none());
//! ```

use crate::models::{AssetRef, Record, RecordModel, ValidationError};
use url::Url;

/// Record type tag used for fruits
pub const FRUIT_RECORD_TYPE: &str = "Fruit";

const NAME_FIELD: &str = "name";
const IMAGE_FIELD: &str = "image";

/// Fruit record wrapper
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fruit {
    record: Record,
}

impl Fruit {
    /// Create a new, unsaved fruit
    pub fn new(name: impl Into<String>, image_url: Option<Url>) -> Self {
        let mut record = Record::new(FRUIT_RECORD_TYPE);
        record.set(NAME_FIELD, name.into());
        if let Some(url) = image_url {
            record.set(IMAGE_FIELD, AssetRef::new(url));
        }
        Self { record }
    }

    /// Fruit name, empty when the record has none
    pub fn name(&self) -> &str {
        self.record.get_string(NAME_FIELD).unwrap_or_default()
    }

    /// URL of the attached image asset
    pub fn image_url(&self) -> Option<&Url> {
        self.record.get_asset(IMAGE_FIELD).map(|asset| &asset.file_url)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record.set(NAME_FIELD, name.into());
    }

    pub fn set_image_url(&mut self, image_url: Option<Url>) {
        match image_url {
            Some(url) => {
                self.record.set(IMAGE_FIELD, AssetRef::new(url));
            }
            None => {
                self.record.remove(IMAGE_FIELD);
            }
        }
    }
}

impl RecordModel for Fruit {
    const RECORD_TYPE: &'static str = FRUIT_RECORD_TYPE;

    fn from_record(record: Record) -> Result<Self, ValidationError> {
        record.ensure_type(Self::RECORD_TYPE)?;
        record.ensure_string(NAME_FIELD)?;
        record.ensure_asset(IMAGE_FIELD)?;
        Ok(Self { record })
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    fn into_record(self) -> Record {
        self.record
    }
}
