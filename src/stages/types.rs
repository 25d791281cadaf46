//! Stage result contract
//!
//! Both stages report through [`StageResult`]; a driver branches on
//! `status` and hands the whole result to the next stage or the notifier.

use crate::error::{Error, Result};
use crate::storage::ObjectLocation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Outcome of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    Succeeded,
    Failed,
}

impl StageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Succeeded => "SUCCEEDED",
            StageStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus optional location, echoing the invocation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub status: StageStatus,

    /// Object written by the stage
    #[serde(default, alias = "location", skip_serializing_if = "Option::is_none")]
    pub s3_key: Option<String>,

    /// RFC 3339 local capture time, set by the capture stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,

    /// The payload the stage was invoked with
    #[serde(default)]
    pub event: Value,
}

impl StageResult {
    /// Successful result pointing at `location`
    pub fn succeeded(event: Value, location: &ObjectLocation) -> Self {
        Self {
            status: StageStatus::Succeeded,
            s3_key: Some(location.to_string()),
            captured_at: None,
            event,
        }
    }

    /// Failed result; never carries a location
    pub fn failed(event: Value) -> Self {
        Self {
            status: StageStatus::Failed,
            s3_key: None,
            captured_at: None,
            event,
        }
    }

    #[must_use]
    pub fn with_captured_at(mut self, captured_at: impl Into<String>) -> Self {
        self.captured_at = Some(captured_at.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == StageStatus::Succeeded
    }

    /// Parsed `s3_key`, if any
    pub fn location(&self) -> Option<Result<ObjectLocation>> {
        self.s3_key.as_deref().map(str::parse)
    }

    /// Serialize for the next stage or the driver
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// What the curation stage reads from its invocation payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurationRequest {
    #[serde(alias = "location")]
    pub s3_key: String,

    #[serde(default)]
    pub captured_at: Option<String>,
}

impl CurationRequest {
    /// Extract from a StageResult-shaped payload
    pub fn from_event(event: &Value) -> Result<Self> {
        if event.get("s3_key").is_none() && event.get("location").is_none() {
            return Err(Error::missing_field("s3_key"));
        }
        Ok(Self::deserialize(event)?)
    }
}
