//! Common types used throughout weather-etl
//!
//! Shared enums and helpers referenced from configuration and several modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Compression
// ============================================================================

/// Compression codec for curated Parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionCodec {
    /// No compression
    Uncompressed,
    /// Snappy (the pyarrow/parquet-tools default)
    #[default]
    Snappy,
    /// Zstandard at the default level
    Zstd,
    /// Gzip at the default level
    Gzip,
}

impl From<CompressionCodec> for parquet::basic::Compression {
    fn from(codec: CompressionCodec) -> Self {
        use parquet::basic::{Compression, GzipLevel, ZstdLevel};
        match codec {
            CompressionCodec::Uncompressed => Compression::UNCOMPRESSED,
            CompressionCodec::Snappy => Compression::SNAPPY,
            CompressionCodec::Zstd => Compression::ZSTD(ZstdLevel::default()),
            CompressionCodec::Gzip => Compression::GZIP(GzipLevel::default()),
        }
    }
}

// ============================================================================
// Curation Timestamp
// ============================================================================

/// Which timestamp decides the curated partition path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// Sample the clock when curation runs
    #[default]
    Fresh,
    /// Reuse `captured_at` from the capture result when present
    Capture,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
