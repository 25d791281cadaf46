//! Curation stage
//!
//! Loads a raw document by its location, flattens and types it, and writes
//! the single-row table as Parquet under the curated bucket's partition.

use super::raw::decode_raw;
use super::types::{CurationRequest, StageResult};
use crate::clock::{parse_timestamp, Clock, SystemClock};
use crate::error::Result;
use crate::storage::{path_for, BucketStore, ObjectLocation, Zone};
use crate::transform::{curate_document, ParquetWriterConfig};
use crate::types::TimestampSource;
use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// A curated table that has been stored
#[derive(Debug, Clone)]
pub struct CuratedOutput {
    pub location: ObjectLocation,
    pub columns: usize,
}

/// Converts raw documents into curated Parquet tables
pub struct CurationStage {
    raw_store: BucketStore,
    curated_store: BucketStore,
    clock: Arc<dyn Clock>,
    timestamp_source: TimestampSource,
    parquet: ParquetWriterConfig,
}

impl CurationStage {
    pub fn new(raw_store: BucketStore, curated_store: BucketStore) -> Self {
        Self {
            raw_store,
            curated_store,
            clock: Arc::new(SystemClock::default()),
            timestamp_source: TimestampSource::default(),
            parquet: ParquetWriterConfig::default(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_timestamp_source(mut self, source: TimestampSource) -> Self {
        self.timestamp_source = source;
        self
    }

    #[must_use]
    pub fn with_parquet(mut self, parquet: ParquetWriterConfig) -> Self {
        self.parquet = parquet;
        self
    }

    /// Run the stage. Never fails; errors become a FAILED result.
    pub async fn run(&self, event: Value) -> StageResult {
        match self.curate(&event).await {
            Ok(output) => {
                info!(location = %output.location, columns = output.columns, "parquet file saved");
                StageResult::succeeded(event, &output.location)
            }
            Err(e) => {
                error!(error = %e, "curation failed");
                StageResult::failed(event)
            }
        }
    }

    /// Read, transform and store the document named by `event`
    pub async fn curate(&self, event: &Value) -> Result<CuratedOutput> {
        let request = CurationRequest::from_event(event)?;
        let source: ObjectLocation = request.s3_key.parse()?;

        let data = self.raw_store.get(&source).await?;
        let document = decode_raw(&data)?;
        let table = curate_document(&document)?;

        let timestamp = self.partition_time(request.captured_at.as_deref())?;
        let location = path_for(self.curated_store.bucket(), Zone::Curated, &timestamp);
        self.curated_store
            .put(&location, table.to_parquet(&self.parquet)?)
            .await?;

        Ok(CuratedOutput {
            location,
            columns: table.num_columns(),
        })
    }

    /// Time deciding the curated partition
    fn partition_time(&self, captured_at: Option<&str>) -> Result<DateTime<Tz>> {
        match (self.timestamp_source, captured_at) {
            (TimestampSource::Capture, Some(value)) => {
                parse_timestamp(value, self.clock.timezone())
            }
            _ => Ok(self.clock.now()),
        }
    }
}

impl std::fmt::Debug for CurationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurationStage")
            .field("raw_store", &self.raw_store)
            .field("curated_store", &self.curated_store)
            .field("timestamp_source", &self.timestamp_source)
            .finish_non_exhaustive()
    }
}
