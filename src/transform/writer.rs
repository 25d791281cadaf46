//! Parquet writer settings
//!
//! Curated tables are always written whole, in memory, and then handed to
//! the object store, so only the writer properties need configuring.

use crate::types::CompressionCodec;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

/// Configuration for Parquet output
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config using the given codec
    #[must_use]
    pub fn from_codec(codec: CompressionCodec) -> Self {
        Self::default().with_compression(codec.into())
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Get the compression algorithm
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Build writer properties
    pub(crate) fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .build()
    }
}
