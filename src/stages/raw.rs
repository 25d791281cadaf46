//! Raw document encoding
//!
//! Raw objects hold the API document serialized to JSON text, with that text
//! serialized again as a JSON string. Readers must undo both layers.

use crate::error::{Error, Result};
use bytes::Bytes;
use serde_json::Value;

/// Serialize a document twice for the raw store
pub fn encode_raw(document: &Value) -> Result<Bytes> {
    let text = serde_json::to_string(document)?;
    Ok(Bytes::from(serde_json::to_vec(&text)?))
}

/// Reverse [`encode_raw`]
pub fn decode_raw(data: &[u8]) -> Result<Value> {
    let text: String = serde_json::from_slice(data)
        .map_err(|e| Error::malformed(format!("outer layer is not a JSON string: {e}")))?;

    serde_json::from_str(&text)
        .map_err(|e| Error::malformed(format!("inner layer is not JSON: {e}")))
}
