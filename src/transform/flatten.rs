//! Two-level JSON flattening
//!
//! The API document is an object of objects. Each inner scalar becomes a
//! column named by its inner key; an inner object contributes one column per
//! entry, named by that entry's own key. Anything nested deeper is rejected.

use super::types::FlatRecord;
use crate::error::{Error, Result};
use serde_json::Value;

/// Flatten a two-level nested document into ordered columns
pub fn flatten(document: &Value) -> Result<FlatRecord> {
    let Value::Object(outer) = document else {
        return Err(Error::shape(format!(
            "expected a JSON object at the top level, found {}",
            kind_of(document)
        )));
    };

    let mut record = FlatRecord::new();

    for (group, inner) in outer {
        let Value::Object(inner) = inner else {
            return Err(Error::shape(format!(
                "expected an object under '{group}', found {}",
                kind_of(inner)
            )));
        };

        for (key, value) in inner {
            match value {
                Value::Object(sub) => {
                    for (sub_key, sub_value) in sub {
                        if sub_value.is_object() {
                            return Err(Error::UnsupportedNesting {
                                path: format!("{group}.{key}.{sub_key}"),
                            });
                        }
                        record.push(sub_key.clone(), sub_value.clone());
                    }
                }
                _ => record.push(key.clone(), value.clone()),
            }
        }
    }

    Ok(record)
}

/// Short name of a JSON value's kind, for error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
