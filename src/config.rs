//! Pipeline configuration
//!
//! Loaded from YAML, with defaults matching the hourly weather deployment.
//! The bucket names can be overridden from the `raw_bucket` and
//! `curated_bucket` environment variables.

use crate::clock::{parse_timezone, DEFAULT_TIMEZONE};
use crate::error::{Error, Result};
use crate::stages::DEFAULT_SECRET_ID;
use crate::types::{CompressionCodec, OptionStringExt, TimestampSource};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the raw bucket
pub const RAW_BUCKET_ENV: &str = "raw_bucket";

/// Environment variable naming the curated bucket
pub const CURATED_BUCKET_ENV: &str = "curated_bucket";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bucket receiving raw API responses
    #[serde(default)]
    pub raw_bucket: String,

    /// Bucket receiving curated Parquet tables
    #[serde(default)]
    pub curated_bucket: String,

    /// Where buckets live
    #[serde(default)]
    pub storage: StorageBackend,

    /// External API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Identifier of the API key in the secret store
    #[serde(default = "default_secret_id")]
    pub secret_id: String,

    /// IANA timezone used for partition paths
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Retry settings for the API call
    #[serde(default)]
    pub retry: RetryConfig,

    /// Parquet output settings
    #[serde(default)]
    pub parquet: ParquetConfig,

    /// Timestamp used for the curated partition
    #[serde(default)]
    pub curation_timestamp: TimestampSource,

    /// Failure notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Upper bound on one end-to-end run, in seconds
    #[serde(default = "default_workflow_timeout")]
    pub workflow_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_bucket: String::new(),
            curated_bucket: String::new(),
            storage: StorageBackend::default(),
            api: ApiConfig::default(),
            secret_id: default_secret_id(),
            timezone: default_timezone(),
            retry: RetryConfig::default(),
            parquet: ParquetConfig::default(),
            curation_timestamp: TimestampSource::default(),
            notify: NotifyConfig::default(),
            workflow_timeout_secs: default_workflow_timeout(),
        }
    }
}

fn default_secret_id() -> String {
    DEFAULT_SECRET_ID.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_workflow_timeout() -> u64 {
    300
}

impl PipelineConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Load from an optional file, apply environment overrides and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Override buckets from environment-style lookups
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bucket) = lookup(RAW_BUCKET_ENV).none_if_empty() {
            self.raw_bucket = bucket;
        }
        if let Some(bucket) = lookup(CURATED_BUCKET_ENV).none_if_empty() {
            self.curated_bucket = bucket;
        }
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.raw_bucket.trim().is_empty() {
            return Err(Error::missing_field(RAW_BUCKET_ENV));
        }
        if self.curated_bucket.trim().is_empty() {
            return Err(Error::missing_field(CURATED_BUCKET_ENV));
        }
        if self.secret_id.trim().is_empty() {
            return Err(Error::missing_field("secret_id"));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::invalid_value(
                "retry.max_attempts",
                "must be at least 1",
            ));
        }
        if self.workflow_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "workflow_timeout_secs",
                "must be at least 1",
            ));
        }

        let endpoint = url::Url::parse(&self.api.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api.endpoint",
                format!("unsupported scheme '{}'", endpoint.scheme()),
            ));
        }

        if let Some(webhook) = &self.notify.webhook_url {
            url::Url::parse(webhook)?;
        }

        self.tz()?;
        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn workflow_timeout(&self) -> Duration {
        Duration::from_secs(self.workflow_timeout_secs)
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Object storage backend for both buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// AWS S3, credentials and region from the environment
    #[default]
    S3,
    /// Directory per bucket under `root`
    Local { root: PathBuf },
    /// Process-local memory, lost on exit
    Memory,
}

// ============================================================================
// API
// ============================================================================

/// External weather API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Endpoint URL, queried with GET
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Value of the `q` parameter (latitude, longitude)
    #[serde(default = "default_location")]
    pub location: String,

    /// Value of the `aqi` parameter
    #[serde(default = "default_aqi")]
    pub aqi: String,

    /// Query parameter carrying the API key
    #[serde(default = "default_key_param")]
    pub key_param: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            location: default_location(),
            aqi: default_aqi(),
            key_param: default_key_param(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_endpoint() -> String {
    "http://api.weatherapi.com/v1/current.json".to_string()
}

fn default_location() -> String {
    "-37.504136, 145.744302".to_string()
}

fn default_aqi() -> String {
    "no".to_string()
}

fn default_key_param() -> String {
    "key".to_string()
}

fn default_user_agent() -> String {
    format!("weather-etl/{}", env!("CARGO_PKG_VERSION"))
}

// ============================================================================
// Retry
// ============================================================================

/// Fixed-delay retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay after each failed attempt, in seconds
    #[serde(default = "default_delay_secs")]
    pub delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_delay_secs(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_secs() -> u64 {
    3
}

// ============================================================================
// Parquet / Notify
// ============================================================================

/// Parquet output settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParquetConfig {
    #[serde(default)]
    pub compression: CompressionCodec,
}

/// Failure notification settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// POST failures here; log only when unset
    #[serde(default)]
    pub webhook_url: Option<String>,
}
