//! Error types for weather-etl
//!
//! This module defines the error hierarchy for the whole pipeline.
//! Stage boundaries catch these and turn them into a FAILED `StageResult`;
//! everything below a stage returns `Result<T, Error>`.

use thiserror::Error;

/// The main error type for weather-etl
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("Secret '{secret_id}' could not be retrieved: {message}")]
    MissingCredential { secret_id: String, message: String },

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API responded with HTTP {status}")]
    TransientApi { status: u16 },

    #[error("API did not respond after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("API response is not well-formed JSON: {message}")]
    MalformedResponse { message: String },

    // ============================================================================
    // Transform Errors
    // ============================================================================
    #[error("Unsupported nesting depth at '{path}': only two levels plus one sub-object are flattened")]
    UnsupportedNesting { path: String },

    #[error("Unexpected document shape: {message}")]
    UnexpectedShape { message: String },

    #[error("Column '{column}' declared {expected} but value is {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Storage error at '{location}': {message}")]
    StorageIo { location: String, message: String },

    #[error("Invalid object location '{location}': {message}")]
    InvalidLocation { location: String, message: String },

    // ============================================================================
    // Notification Errors
    // ============================================================================
    #[error("Notification failed: {message}")]
    Notify { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a missing credential error
    pub fn missing_credential(secret_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingCredential {
            secret_id: secret_id.into(),
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an unexpected shape error
    pub fn shape(message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a storage error
    pub fn storage(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageIo {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create an invalid location error
    pub fn invalid_location(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidLocation {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a notification error
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify {
            message: message.into(),
        }
    }

    /// Check if another attempt against the API could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_) | Error::TransientApi { .. })
    }
}

/// Result type alias for weather-etl
pub type Result<T> = std::result::Result<T, Error>;
