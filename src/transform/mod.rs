//! Transform module
//!
//! Turns one nested API document into a typed single-row table.
//!
//! # Overview
//!
//! - `flatten` - two-level document to ordered (name, value) columns
//! - `infer_schema` - per-value column types (null, int32, float32, string)
//! - `encode` - Arrow table, serializable to Parquet

mod encode;
mod flatten;
mod infer;
mod types;
mod writer;

pub use encode::{encode, CuratedTable};
pub use flatten::flatten;
pub use infer::{classify, infer_schema};
pub use types::{ColumnDef, ColumnSchema, ColumnType, FlatRecord};
pub use writer::ParquetWriterConfig;

use crate::error::Result;
use serde_json::Value;

/// Run a document through flatten, inference and encoding
pub fn curate_document(document: &Value) -> Result<CuratedTable> {
    let record = flatten(document)?;
    let schema = infer_schema(&record);
    encode(&schema, &record.values())
}

#[cfg(test)]
mod tests;
