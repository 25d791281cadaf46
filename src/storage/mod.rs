//! Storage module
//!
//! Raw and curated buckets on top of `object_store`.
//!
//! # Overview
//!
//! - `BucketStore` - one bucket on S3, the local filesystem or memory
//! - `path_for` - time-partitioned object location per zone
//! - `ObjectLocation` - `s3://bucket/key` references passed between stages

mod bucket;
mod paths;

pub use bucket::BucketStore;
pub use paths::{key_for, path_for, ObjectLocation, Zone, CURATED_FILE_NAME};
