//! Partitioned object locations
//!
//! Both zones are partitioned by local capture time:
//! - raw: `raw/{year}/{month}/{day}/{hour}.json`
//! - curated: `curated/{year}/{month}/{day}/{hour}/weather.parquet`
//!
//! Month, day and hour are not zero padded.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use std::fmt;
use std::str::FromStr;

/// File name of every curated table
pub const CURATED_FILE_NAME: &str = "weather.parquet";

/// Which side of the pipeline an object belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Raw,
    Curated,
}

impl Zone {
    /// Key prefix inside the bucket
    pub fn prefix(self) -> &'static str {
        match self {
            Zone::Raw => "raw",
            Zone::Curated => "curated",
        }
    }
}

/// A bucket plus an object key, displayed as `s3://{bucket}/{key}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    bucket: String,
    key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

impl FromStr for ObjectLocation {
    type Err = Error;

    /// Accepts `scheme://bucket/key` for any scheme, or bare `bucket/key`
    fn from_str(s: &str) -> Result<Self> {
        let without_scheme = s.split_once("://").map_or(s, |(_, rest)| rest);

        let (bucket, key) = without_scheme
            .split_once('/')
            .ok_or_else(|| Error::invalid_location(s, "expected bucket/key"))?;

        let key = key.trim_start_matches('/');
        if bucket.is_empty() || key.is_empty() {
            return Err(Error::invalid_location(s, "bucket and key must be non-empty"));
        }

        Ok(Self::new(bucket, key))
    }
}

/// Object key for a zone at a given local time
pub fn key_for<Tz: TimeZone>(zone: Zone, timestamp: &DateTime<Tz>) -> String {
    let (year, month, day, hour) = (
        timestamp.year(),
        timestamp.month(),
        timestamp.day(),
        timestamp.hour(),
    );
    let prefix = zone.prefix();

    match zone {
        Zone::Raw => format!("{prefix}/{year}/{month}/{day}/{hour}.json"),
        Zone::Curated => format!("{prefix}/{year}/{month}/{day}/{hour}/{CURATED_FILE_NAME}"),
    }
}

/// Full location for a zone in `bucket` at a given local time
pub fn path_for<Tz: TimeZone>(bucket: &str, zone: Zone, timestamp: &DateTime<Tz>) -> ObjectLocation {
    ObjectLocation::new(bucket, key_for(zone, timestamp))
}
