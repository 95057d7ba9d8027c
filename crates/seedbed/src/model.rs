//! Model descriptors: which columns a model fills and how each value is faked.
//!
//! A [`ModelDescriptor`] is declared once per model, either built in code,
//! derived from a Rust type through the [`Model`] trait, or deserialized from
//! JSON. The generator turns it into a [`ModelInstance`] per row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A single generated value, ready to be bound to an INSERT parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeedValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    #[serde(skip)]
    Decimal(Decimal),
    #[serde(skip)]
    Uuid(Uuid),
    #[serde(skip)]
    Timestamp(OffsetDateTime),
    Text(String),
}

impl SeedValue {
    /// Returns the value as a string slice if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for SeedValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SeedValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SeedValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for SeedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Uuid> for SeedValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

/// Generation rule attached to a model field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FakeKind {
    Uuid,
    Name,
    FirstName,
    LastName,
    Email,
    Username,
    Phone,
    Company,
    Word,
    Sentence,
    Boolean,
    Integer { min: i64, max: i64 },
    Float { min: f64, max: f64 },
    /// Monetary amount with two decimal places.
    Amount { min: f64, max: f64 },
    /// Timestamp between two unix times (seconds).
    Timestamp { from: i64, to: i64 },
    OneOf { values: Vec<String> },
    /// The same value on every row.
    ///
    /// A `null` constant is bound as a text-typed NULL, so on PostgreSQL it
    /// only fits text-compatible columns. Integer, uuid or timestamp columns
    /// reject it with a type error.
    Constant { value: SeedValue },
}

/// A model field bound to a table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub column: String,
    #[serde(flatten)]
    pub kind: FakeKind,
}

impl FieldSpec {
    pub fn new(column: impl Into<String>, kind: FakeKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }
}

/// Field-to-column mapping for one model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

impl ModelDescriptor {
    /// Creates an empty descriptor; add fields with [`ModelDescriptor::field`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field mapped to `column`.
    pub fn field(mut self, column: impl Into<String>, kind: FakeKind) -> Self {
        self.fields.push(FieldSpec::new(column, kind));
        self
    }

    /// A descriptor without fields is treated as absent.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.column.as_str())
    }

    /// Returns the first column declared more than once, if any.
    pub fn duplicate_column(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.columns().find(|c| !seen.insert(*c))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Types that declare their own descriptor at compile time.
///
/// ```rust,ignore
/// struct Product;
///
/// impl Model for Product {
///     fn descriptor() -> ModelDescriptor {
///         ModelDescriptor::new("product")
///             .field("id", FakeKind::Uuid)
///             .field("name", FakeKind::Word)
///             .field("price", FakeKind::Amount { min: 1.0, max: 500.0 })
///     }
/// }
/// ```
pub trait Model {
    fn descriptor() -> ModelDescriptor;
}

/// One generated model value set, keyed by column tag in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelInstance {
    pub values: Vec<(String, SeedValue)>,
}

impl ModelInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: SeedValue) {
        self.values.push((column.into(), value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
