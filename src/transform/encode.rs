//! Single-row table encoding
//!
//! Builds an Arrow `RecordBatch` with one row from a column schema and the
//! positional values, and moves it to and from Parquet bytes.

use super::flatten::kind_of;
use super::types::{ColumnSchema, ColumnType};
use super::writer::ParquetWriterConfig;
use crate::error::{Error, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float32Array, Int32Array, NullArray, StringArray};
use arrow::datatypes::{Field, Float32Type, Int32Type, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use serde_json::Value;
use std::sync::Arc;

/// A curated single-row table
#[derive(Debug, Clone)]
pub struct CuratedTable {
    batch: RecordBatch,
}

impl CuratedTable {
    /// Wrap an existing batch
    pub fn from_batch(batch: RecordBatch) -> Self {
        Self { batch }
    }

    /// The underlying Arrow batch
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Ordered (name, type, first-row value) triples
    pub fn columns(&self) -> Result<Vec<(String, ColumnType, Value)>> {
        let schema = self.batch.schema();
        let mut out = Vec::with_capacity(schema.fields().len());

        for (idx, field) in schema.fields().iter().enumerate() {
            let column_type = ColumnType::from_arrow(field.data_type()).ok_or_else(|| {
                Error::type_mismatch(
                    field.name(),
                    "null, int32, float32 or string",
                    field.data_type().to_string(),
                )
            })?;
            let value = cell_value(field.name(), column_type, self.batch.column(idx).as_ref())?;
            out.push((field.name().clone(), column_type, value));
        }

        Ok(out)
    }

    /// Serialize to an in-memory Parquet file
    pub fn to_parquet(&self, config: &ParquetWriterConfig) -> Result<Bytes> {
        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(
            &mut buffer,
            self.batch.schema(),
            Some(config.build_properties()),
        )?;
        writer.write(&self.batch)?;
        writer.close()?;
        Ok(Bytes::from(buffer))
    }

    /// Read a table back from Parquet bytes
    pub fn from_parquet(data: Bytes) -> Result<Self> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(data)?;
        let schema = builder.schema().clone();
        let mut batches = builder
            .build()?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let batch = if batches.len() == 1 {
            batches.remove(0)
        } else {
            arrow::compute::concat_batches(&schema, &batches)?
        };

        Ok(Self { batch })
    }
}

/// Encode positional values into a one-row table typed by `schema`
pub fn encode(schema: &ColumnSchema, values: &[Value]) -> Result<CuratedTable> {
    if schema.len() != values.len() {
        return Err(Error::type_mismatch(
            "<row>",
            format!("{} values", schema.len()),
            format!("{} values", values.len()),
        ));
    }

    let mut fields = Vec::with_capacity(schema.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.len());

    for (def, value) in schema.columns().iter().zip(values) {
        columns.push(build_cell(&def.name, def.column_type, value)?);
        fields.push(Field::new(&def.name, def.column_type.to_arrow(), true));
    }

    let options = RecordBatchOptions::new().with_row_count(Some(1));
    let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)?;

    Ok(CuratedTable { batch })
}

/// Build a one-element array, rejecting values the column type cannot hold
fn build_cell(name: &str, column_type: ColumnType, value: &Value) -> Result<ArrayRef> {
    let mismatch = || Error::type_mismatch(name, column_type.as_str(), kind_of(value));

    match column_type {
        ColumnType::Null => match value {
            Value::Null => Ok(Arc::new(NullArray::new(1))),
            _ => Err(mismatch()),
        },

        ColumnType::Int => {
            let n = value.as_i64().ok_or_else(mismatch)?;
            let n = i32::try_from(n).map_err(|_| {
                Error::type_mismatch(name, column_type.as_str(), format!("integer {n} outside i32"))
            })?;
            Ok(Arc::new(Int32Array::from(vec![n])))
        }

        ColumnType::Float => {
            let n = value.as_f64().ok_or_else(mismatch)?;
            let narrowed = n as f32;
            if n.is_finite() && !narrowed.is_finite() {
                return Err(Error::type_mismatch(
                    name,
                    column_type.as_str(),
                    format!("number {n} outside f32"),
                ));
            }
            Ok(Arc::new(Float32Array::from(vec![narrowed])))
        }

        ColumnType::String => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Array(_) => serde_json::to_string(value)?,
                _ => return Err(mismatch()),
            };
            Ok(Arc::new(StringArray::from(vec![text])))
        }
    }
}

/// Read row 0 of a column back as JSON
fn cell_value(name: &str, column_type: ColumnType, array: &dyn Array) -> Result<Value> {
    if array.is_empty() || array.is_null(0) {
        return Ok(Value::Null);
    }

    let mismatch = || Error::type_mismatch(name, column_type.as_str(), array.data_type().to_string());

    match column_type {
        ColumnType::Null => Ok(Value::Null),
        ColumnType::Int => {
            let arr = array.as_primitive_opt::<Int32Type>().ok_or_else(mismatch)?;
            Ok(Value::from(arr.value(0)))
        }
        ColumnType::Float => {
            let arr = array.as_primitive_opt::<Float32Type>().ok_or_else(mismatch)?;
            let val = f64::from(arr.value(0));
            Ok(serde_json::Number::from_f64(val).map_or(Value::Null, Value::Number))
        }
        ColumnType::String => {
            let arr = array.as_string_opt::<i32>().ok_or_else(mismatch)?;
            Ok(Value::String(arr.value(0).to_string()))
        }
    }
}
