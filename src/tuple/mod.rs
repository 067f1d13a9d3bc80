//! Tuples and tuple formats
//!
//! A tuple is an immutable, reference-counted array of field values. A tuple
//! format describes how fields are addressed: the shared runtime format knows
//! positions only, while a named format carries a field dictionary so fields
//! can be looked up by name.
//!
//! Formats are reference counted with `Arc`. Dropping the last reference
//! releases the format and its slot in the owning `FormatRegistry`.

mod errors;
mod format;

pub use errors::{FormatError, FormatResult};
pub use format::{FormatRegistry, TupleDictionary, TupleFormat, DEFAULT_FORMAT_LIMIT};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Shared handle to an immutable tuple.
pub type TupleRef = Arc<Tuple>;

/// Field types a space definition may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Any value
    Any,
    /// Non-negative integer
    Unsigned,
    /// Signed integer
    Integer,
    /// Integer or floating point
    Number,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// Array of values
    Array,
    /// Key/value map
    Map,
}

impl FieldType {
    /// Returns the type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Any => "any",
            FieldType::Unsigned => "unsigned",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Map => "map",
        }
    }
}

/// Field definition of a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field may hold null
    #[serde(default)]
    pub is_nullable: bool,
}

impl FieldDef {
    /// Create a non-nullable field
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_nullable: false,
        }
    }

    /// Create a nullable field
    pub fn nullable(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_nullable: true,
        }
    }
}

/// An immutable array of field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple {
    fields: Vec<Value>,
}

impl Tuple {
    /// Creates a tuple from field values.
    pub fn new(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    /// Creates a shared tuple handle.
    pub fn into_ref(self) -> TupleRef {
        Arc::new(self)
    }

    /// Returns the field at `position`, if present.
    #[inline]
    pub fn field(&self, position: usize) -> Option<&Value> {
        self.fields.get(position)
    }

    /// Returns all fields.
    #[inline]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the tuple has no fields.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(fields: Vec<Value>) -> Self {
        Self::new(fields)
    }
}
