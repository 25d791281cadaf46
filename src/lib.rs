// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Weather ETL
//!
//! Hourly capture of a weather API response and its curation into a
//! single-row Parquet table.
//!
//! ## Features
//!
//! - **Bounded Capture**: three attempts with a fixed delay, credential from a secret store
//! - **Raw Zone**: the response stored as double-encoded JSON under `raw/{y}/{m}/{d}/{h}.json`
//! - **Flatten + Infer**: two-level documents to ordered, typed columns
//! - **Parquet Output**: one row under `curated/{y}/{m}/{d}/{h}/weather.parquet`
//! - **Workflow**: capture then curate, notifying on failure
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use weather_etl::transform::curate_document;
//! use weather_etl::transform::ParquetWriterConfig;
//!
//! let doc = serde_json::json!({"current": {"temp_c": 21.5, "condition": {"text": "Sunny"}}});
//! let table = curate_document(&doc)?;
//! let parquet = table.to_parquet(&ParquetWriterConfig::default())?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Workflow                             │
//! │   capture ──▶ curate ──▶ SUCCEEDED    (FAILED ──▶ notify)    │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────┬───┴─────────┬────────────┬────────┐
//! │    HTTP    │   Secrets   │  Transform  │  Storage   │ Clock  │
//! ├────────────┼─────────────┼─────────────┼────────────┼────────┤
//! │ API source │ Env         │ Flatten     │ S3         │ System │
//! │ Retry      │ Static      │ Infer       │ Local      │ Fixed  │
//! │            │             │ Parquet     │ Memory     │        │
//! └────────────┴─────────────┴─────────────┴────────────┴────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the pipeline
pub mod error;

/// Common types and type aliases
pub mod types;

/// Time source and timezone handling
pub mod clock;

/// Pipeline configuration
pub mod config;

/// Weather API client with fixed-delay retry
pub mod http;

/// API credential lookup
pub mod secrets;

/// Raw and curated object storage
pub mod storage;

/// Flatten, schema inference and Parquet encoding
pub mod transform;

/// Capture and curation stages
pub mod stages;

/// Failure notification
pub mod notify;

/// Capture-then-curate driver
pub mod workflow;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use stages::{CaptureStage, CurationStage, StageResult, StageStatus};
pub use workflow::{Workflow, WorkflowOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
