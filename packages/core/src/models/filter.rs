//! Query Filters
//!
//! A [`Filter`] combines a [`Predicate`] over record fields with optional
//! sort descriptors and an optional result limit. The always-true predicate
//! is the default, so `Filter::all()` matches every record of a type.
//!
//! # Examples
//!
//! ```rust
//! use cloudnotes_core::models::{Filter, Predicate, SortDescriptor};
//!
//! // Every fruit, A-Z by name, at most 10
//! let filter = Filter::all()
//!     .sorted_by(SortDescriptor::ascending("name"))
//!     .with_limit(10);
//!
//! // Only fruits named "Kiwi"
//! let kiwis = Filter::new(Predicate::equals("name", "Kiwi"));
//! # let _ = (filter, kiwis);
//! ```

use crate::models::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Comparison operator for field predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Equality (=)
    Equals,
    /// Inequality (!=)
    NotEquals,
    /// Less than (<)
    LessThan,
    /// Less than or equal (<=)
    LessThanOrEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal (>=)
    GreaterThanOrEqual,
    /// Prefix match
    BeginsWith,
    /// Substring match
    Contains,
}

impl FilterOperator {
    fn evaluate(self, actual: &FieldValue, expected: &FieldValue) -> bool {
        let (a, b) = (actual.comparable_text(), expected.comparable_text());
        match self {
            Self::Equals => actual == expected,
            Self::NotEquals => actual != expected,
            Self::LessThan => a < b,
            Self::LessThanOrEqual => a <= b,
            Self::GreaterThan => a > b,
            Self::GreaterThanOrEqual => a >= b,
            Self::BeginsWith => a.starts_with(b),
            Self::Contains => a.contains(b),
        }
    }
}

/// Predicate over a record's fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    /// Matches every record
    #[default]
    True,

    /// Compares one field against a value
    ///
    /// A record without the field only matches `NotEquals`.
    Field {
        field: String,
        operator: FilterOperator,
        value: FieldValue,
    },

    /// All sub-predicates match (empty list matches everything)
    And(Vec<Predicate>),

    /// Any sub-predicate matches (empty list matches nothing)
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn field(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self::Field {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn equals(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::field(field, FilterOperator::Equals, value)
    }

    /// Evaluate the predicate against a record
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Self::True => true,
            Self::Field {
                field,
                operator,
                value,
            } => match record.get(field) {
                Some(actual) => operator.evaluate(actual, value),
                None => *operator == FilterOperator::NotEquals,
            },
            Self::And(predicates) => predicates.iter().all(|p| p.matches(record)),
            Self::Or(predicates) => predicates.iter().any(|p| p.matches(record)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort key for query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub field: String,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Compare two records on this key (records missing the field sort first
    /// when ascending)
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let left = a.get(&self.field).map(FieldValue::comparable_text);
        let right = b.get(&self.field).map(FieldValue::comparable_text);
        let ordering = left.cmp(&right);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Compare two records by a list of sort descriptors, first key first
pub fn compare_records(sort: &[SortDescriptor], a: &Record, b: &Record) -> Ordering {
    sort.iter()
        .map(|descriptor| descriptor.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Record filter for fetch operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Predicate records must match
    #[serde(default)]
    pub predicate: Predicate,

    /// Sort order, applied key by key
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortDescriptor>,

    /// Maximum number of results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Filter {
    /// Filter matching every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            ..Default::default()
        }
    }

    /// Append a sort key (can be called multiple times)
    pub fn sorted_by(mut self, descriptor: SortDescriptor) -> Self {
        self.sort.push(descriptor);
        self
    }

    /// Set result limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
