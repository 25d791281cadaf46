//! Per-value column type inference
//!
//! Exactly one row is ever processed, so each value is classified on its own
//! with no reconciliation across rows. The check order is fixed: null, then
//! integer, then float, then everything else as string.

use super::types::{ColumnDef, ColumnSchema, ColumnType, FlatRecord};
use serde_json::Value;

/// Classify a single JSON value
pub fn classify(value: &Value) -> ColumnType {
    match value {
        Value::Null => ColumnType::Null,
        Value::Number(n) if n.is_i64() || n.is_u64() => ColumnType::Int,
        Value::Number(_) => ColumnType::Float,
        _ => ColumnType::String,
    }
}

/// Infer a column schema for a flattened record
pub fn infer_schema(record: &FlatRecord) -> ColumnSchema {
    let columns = record
        .entries()
        .iter()
        .map(|(name, value)| ColumnDef::new(name.clone(), classify(value)))
        .collect();

    ColumnSchema::new(columns)
}
