//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::clock::SystemClock;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::http::{Retry, RetryPolicy, TokioSleeper, WeatherApiClient};
use crate::notify;
use crate::secrets::EnvSecretStore;
use crate::stages::{CaptureStage, CurationStage, StageStatus};
use crate::storage::BucketStore;
use crate::transform::ParquetWriterConfig;
use crate::workflow::Workflow;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, returning the final status
    pub async fn run(&self) -> Result<StageStatus> {
        let config = PipelineConfig::load(self.cli.config.as_deref())?;
        debug!(raw = %config.raw_bucket, curated = %config.curated_bucket, "configuration loaded");

        match &self.cli.command {
            Commands::Capture { event_json } => {
                let (raw, _) = open_buckets(&config)?;
                let stage = build_capture(&config, raw)?;
                let result = stage.run(parse_event(event_json.as_deref())?).await;
                self.print(&result)?;
                Ok(result.status)
            }
            Commands::Curate { s3_key, event_json } => {
                let event = match s3_key {
                    Some(key) => json!({ "status": StageStatus::Succeeded, "s3_key": key }),
                    None => parse_event(event_json.as_deref())?,
                };
                let (raw, curated) = open_buckets(&config)?;
                let stage = build_curation(&config, raw, curated)?;
                let result = stage.run(event).await;
                self.print(&result)?;
                Ok(result.status)
            }
            Commands::Run { event_json } => {
                let workflow = build_workflow(&config)?;
                let outcome = workflow.run(parse_event(event_json.as_deref())?).await;
                self.print(&outcome)?;
                Ok(outcome.status)
            }
            Commands::ShowConfig => {
                print!("{}", serde_yaml::to_string(&config)?);
                Ok(StageStatus::Succeeded)
            }
        }
    }

    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = if self.cli.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{text}");
        Ok(())
    }
}

/// Inline JSON payload, `{}` when absent
fn parse_event(event_json: Option<&str>) -> Result<Value> {
    match event_json {
        Some(text) => serde_json::from_str(text)
            .map_err(|e| Error::invalid_value("event_json", e.to_string())),
        None => Ok(json!({})),
    }
}

// ============================================================================
// Stage Construction
// ============================================================================

/// Raw and curated buckets on the configured backend
fn open_buckets(config: &PipelineConfig) -> Result<(BucketStore, BucketStore)> {
    Ok((
        BucketStore::from_backend(&config.storage, &config.raw_bucket)?,
        BucketStore::from_backend(&config.storage, &config.curated_bucket)?,
    ))
}

fn build_capture(config: &PipelineConfig, raw: BucketStore) -> Result<CaptureStage> {
    let api = WeatherApiClient::new(&config.api)?;
    let retry = Retry::new(RetryPolicy::from(&config.retry), Arc::new(TokioSleeper));

    Ok(CaptureStage::new(Arc::new(api), Arc::new(EnvSecretStore::new()), raw)
        .with_clock(Arc::new(SystemClock::new(config.tz()?)))
        .with_retry(retry)
        .with_secret_id(config.secret_id.clone()))
}

fn build_curation(
    config: &PipelineConfig,
    raw: BucketStore,
    curated: BucketStore,
) -> Result<CurationStage> {
    Ok(CurationStage::new(raw, curated)
        .with_clock(Arc::new(SystemClock::new(config.tz()?)))
        .with_timestamp_source(config.curation_timestamp)
        .with_parquet(ParquetWriterConfig::from_codec(config.parquet.compression)))
}

/// Both stages share one set of buckets, so in-memory runs see their own writes
fn build_workflow(config: &PipelineConfig) -> Result<Workflow> {
    let (raw, curated) = open_buckets(config)?;
    let capture = build_capture(config, raw.clone())?;
    let curation = build_curation(config, raw, curated)?;

    Ok(
        Workflow::new(capture, curation, notify::from_config(&config.notify))
            .with_timeout(config.workflow_timeout()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_event() {
        assert_eq!(parse_event(None).unwrap(), json!({}));
        assert_eq!(
            parse_event(Some(r#"{"s3_key": "s3://raw/k"}"#)).unwrap(),
            json!({"s3_key": "s3://raw/k"})
        );
        assert!(parse_event(Some("{not json")).is_err());
    }

    #[test]
    fn test_curate_requires_one_source() {
        assert!(Cli::try_parse_from(["weather-etl", "curate"]).is_err());
        assert!(Cli::try_parse_from([
            "weather-etl",
            "curate",
            "--s3-key",
            "s3://raw/k",
            "--event-json",
            "{}"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["weather-etl", "curate", "--s3-key", "s3://raw/k"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Curate { s3_key: Some(_), event_json: None }
        ));
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["weather-etl", "run", "--config", "pipeline.yaml"]).unwrap();
        assert_eq!(cli.config.unwrap().to_str(), Some("pipeline.yaml"));
        assert!(matches!(cli.command, Commands::Run { event_json: None }));
    }

    #[test]
    fn test_build_stages_from_config() {
        let config = PipelineConfig {
            raw_bucket: "raw".to_string(),
            curated_bucket: "curated".to_string(),
            storage: crate::config::StorageBackend::Memory,
            ..PipelineConfig::default()
        };

        let (raw, curated) = open_buckets(&config).unwrap();
        assert_eq!(raw.bucket(), "raw");
        assert_eq!(curated.bucket(), "curated");
        assert!(build_capture(&config, raw.clone()).is_ok());
        assert!(build_curation(&config, raw, curated).is_ok());
        assert!(build_workflow(&config).is_ok());
    }
}
