//! Tests for the workflow driver

use super::*;
use crate::clock::FixedClock;
use crate::error::{Error, Result};
use crate::http::{ApiResponse, ApiSource, RecordingSleeper, Retry, RetryPolicy};
use crate::secrets::StaticSecretStore;
use crate::stages::DEFAULT_SECRET_ID;
use crate::storage::BucketStore;
use async_trait::async_trait;
use chrono::TimeZone;
use chrono_tz::Australia::Melbourne;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Mutex;

const BODY: &str = r#"{"current": {"temp_c": 21.5, "condition": {"text": "Sunny"}}}"#;

/// Always answers with the same status, optionally after a delay
struct FixedApi {
    status: u16,
    body: &'static str,
    delay: Duration,
}

#[async_trait]
impl ApiSource for FixedApi {
    async fn fetch(&self, _credential: &str) -> Result<ApiResponse> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(ApiResponse::new(self.status, self.body))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    published: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    fn published(&self) -> Vec<String> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, status: &str) -> Result<()> {
        self.published.lock().unwrap().push(status.to_string());
        if self.fail {
            return Err(Error::notify("topic unavailable"));
        }
        Ok(())
    }
}

struct Harness {
    workflow: Workflow,
    notifier: Arc<RecordingNotifier>,
    curated: BucketStore,
}

fn harness(api: FixedApi, notifier: RecordingNotifier) -> Harness {
    let clock = Arc::new(FixedClock::new(
        Melbourne.with_ymd_and_hms(2024, 3, 7, 9, 0, 0).unwrap(),
    ));
    let raw = BucketStore::memory("raw");
    let curated = BucketStore::memory("curated");
    let secrets = StaticSecretStore::new().with_secret(DEFAULT_SECRET_ID, "k");

    let capture = CaptureStage::new(Arc::new(api), Arc::new(secrets), raw.clone())
        .with_clock(clock.clone())
        .with_retry(Retry::new(
            RetryPolicy::default(),
            Arc::new(RecordingSleeper::new()),
        ));
    let curation = CurationStage::new(raw, curated.clone()).with_clock(clock);
    let notifier = Arc::new(notifier);

    Harness {
        workflow: Workflow::new(capture, curation, notifier.clone()),
        notifier,
        curated,
    }
}

fn api(status: u16, body: &'static str) -> FixedApi {
    FixedApi {
        status,
        body,
        delay: Duration::ZERO,
    }
}

#[tokio::test]
async fn test_successful_run() {
    let h = harness(api(200, BODY), RecordingNotifier::default());

    let outcome = h.workflow.run(json!({})).await;

    assert!(outcome.is_success());
    assert!(h.notifier.published().is_empty());
    let curated = outcome.curation.unwrap();
    assert_eq!(
        curated.s3_key.as_deref(),
        Some("s3://curated/curated/2024/3/7/9/weather.parquet")
    );
    assert!(h.curated.get(&curated.location().unwrap().unwrap()).await.is_ok());

    // Curation receives the capture result as its event
    assert_eq!(curated.event, outcome.capture.unwrap().to_value());
}

#[tokio::test]
async fn test_capture_failure_notifies_and_skips_curation() {
    let h = harness(api(503, BODY), RecordingNotifier::default());

    let outcome = h.workflow.run(json!({})).await;

    assert_eq!(outcome.status, StageStatus::Failed);
    assert!(outcome.curation.is_none());
    assert_eq!(h.notifier.published(), vec!["FAILED".to_string()]);
}

#[tokio::test]
async fn test_curation_failure_notifies() {
    // Valid JSON, but nested too deeply to curate
    let h = harness(
        api(200, r#"{"a": {"b": {"c": {"d": 1}}}}"#),
        RecordingNotifier::default(),
    );

    let outcome = h.workflow.run(json!({})).await;

    assert_eq!(outcome.status, StageStatus::Failed);
    assert!(outcome.capture.unwrap().is_success());
    assert_eq!(outcome.curation.unwrap().status, StageStatus::Failed);
    assert_eq!(h.notifier.published(), vec!["FAILED".to_string()]);
}

#[tokio::test]
async fn test_notifier_error_keeps_outcome() {
    let notifier = RecordingNotifier {
        fail: true,
        ..Default::default()
    };
    let h = harness(api(500, BODY), notifier);

    let outcome = h.workflow.run(json!({})).await;

    assert_eq!(outcome.status, StageStatus::Failed);
    assert_eq!(h.notifier.published().len(), 1);
}

#[tokio::test]
async fn test_timeout_fails_and_notifies() {
    let slow = FixedApi {
        status: 200,
        body: BODY,
        delay: Duration::from_secs(30),
    };
    let mut h = harness(slow, RecordingNotifier::default());
    h.workflow = h.workflow.with_timeout(Duration::from_millis(50));

    let outcome = h.workflow.run(json!({})).await;

    assert!(outcome.timed_out);
    assert_eq!(outcome.status, StageStatus::Failed);
    assert!(outcome.capture.is_none());
    assert_eq!(h.notifier.published(), vec!["FAILED".to_string()]);
}

#[test]
fn test_outcome_serialization() {
    let outcome = WorkflowOutcome::timed_out();
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        json!({"status": "FAILED", "timed_out": true})
    );
}
