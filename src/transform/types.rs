//! Transform types
//!
//! The positional record and schema passed between the flattener,
//! the inferencer and the encoder.

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Ordered (column name, scalar value) pairs from one document
///
/// Names may repeat. Consumers match values to columns by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    entries: Vec<(String, Value)>,
}

impl FlatRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.entries.push((name.into(), value));
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no columns
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All (name, value) pairs in order
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Column names in order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Values in order
    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Consume into the underlying pairs
    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }
}

impl From<Vec<(String, Value)>> for FlatRecord {
    fn from(entries: Vec<(String, Value)>) -> Self {
        Self { entries }
    }
}

/// Primitive column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Null,
    Int,
    Float,
    String,
}

impl ColumnType {
    /// Arrow type this column is stored as
    pub fn to_arrow(self) -> DataType {
        match self {
            ColumnType::Null => DataType::Null,
            ColumnType::Int => DataType::Int32,
            ColumnType::Float => DataType::Float32,
            ColumnType::String => DataType::Utf8,
        }
    }

    /// Reverse of [`ColumnType::to_arrow`]
    pub fn from_arrow(data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Null => Some(ColumnType::Null),
            DataType::Int32 => Some(ColumnType::Int),
            DataType::Float32 => Some(ColumnType::Float),
            DataType::Utf8 => Some(ColumnType::String),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Null => "null",
            ColumnType::Int => "int32",
            ColumnType::Float => "float32",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered column definitions, one per [`FlatRecord`] entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    columns: Vec<ColumnDef>,
}

impl ColumnSchema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column types in order
    pub fn types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(|c| c.column_type).collect()
    }
}
