//! Pipeline stages
//!
//! Each stage is a plain async operation that a driver invokes and
//! interprets through the returned [`StageResult`].
//!
//! # Overview
//!
//! - `CaptureStage` - API call with retry, raw document to the raw bucket
//! - `CurationStage` - raw document to a Parquet table in the curated bucket

mod capture;
mod curation;
mod raw;
mod types;

pub use capture::{CaptureStage, RawCapture, DEFAULT_SECRET_ID};
pub use curation::{CuratedOutput, CurationStage};
pub use raw::{decode_raw, encode_raw};
pub use types::{CurationRequest, StageResult, StageStatus};
