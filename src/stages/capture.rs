//! Raw capture stage
//!
//! `INIT → (ATTEMPTING ⇄ WAITING)* → {CAPTURED, EXHAUSTED}`
//!
//! Looks up the API key, calls the API under the retry policy, and writes
//! the raw document under the raw bucket's time partition.

use super::raw::encode_raw;
use super::types::StageResult;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::http::{ApiResponse, ApiSource, Retry, RetryPolicy, TokioSleeper};
use crate::secrets::SecretStore;
use crate::storage::{path_for, BucketStore, ObjectLocation, Zone};
use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Secret identifier used when none is configured
pub const DEFAULT_SECRET_ID: &str = "tdf_test/api_key";

/// A raw document that has been stored
#[derive(Debug, Clone)]
pub struct RawCapture {
    pub location: ObjectLocation,
    pub captured_at: DateTime<Tz>,
    pub document: Value,
}

/// Fetches the API document and stores it raw
pub struct CaptureStage {
    api: Arc<dyn ApiSource>,
    secrets: Arc<dyn SecretStore>,
    raw_store: BucketStore,
    clock: Arc<dyn Clock>,
    retry: Retry,
    secret_id: String,
}

impl CaptureStage {
    /// Create a stage with the default clock, retry policy and secret id
    pub fn new(
        api: Arc<dyn ApiSource>,
        secrets: Arc<dyn SecretStore>,
        raw_store: BucketStore,
    ) -> Self {
        Self {
            api,
            secrets,
            raw_store,
            clock: Arc::new(SystemClock::default()),
            retry: Retry::new(RetryPolicy::default(), Arc::new(TokioSleeper)),
            secret_id: DEFAULT_SECRET_ID.to_string(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_secret_id(mut self, secret_id: impl Into<String>) -> Self {
        self.secret_id = secret_id.into();
        self
    }

    /// Run the stage. Never fails; errors become a FAILED result.
    pub async fn run(&self, event: Value) -> StageResult {
        match self.capture().await {
            Ok(capture) => {
                info!(location = %capture.location, "raw API response saved");
                StageResult::succeeded(event, &capture.location)
                    .with_captured_at(capture.captured_at.to_rfc3339())
            }
            Err(e @ Error::RetriesExhausted { .. }) => {
                error!(error = %e, "API did not respond, will retry at next scheduled interval");
                StageResult::failed(event)
            }
            Err(e) => {
                error!(error = %e, "raw capture failed");
                StageResult::failed(event)
            }
        }
    }

    /// Fetch, parse and store one document
    pub async fn capture(&self) -> Result<RawCapture> {
        let captured_at = self.clock.now();
        let credential = self.secrets.get_secret(&self.secret_id).await?;

        let api = self.api.as_ref();
        let key = credential.as_str();
        let response = self.retry.run(|attempt| fetch_once(api, key, attempt)).await?;
        info!("response OK, continuing");

        let document: Value = serde_json::from_str(&response.body)
            .map_err(|e| Error::malformed(e.to_string()))?;

        let location = path_for(self.raw_store.bucket(), Zone::Raw, &captured_at);
        self.raw_store.put(&location, encode_raw(&document)?).await?;

        Ok(RawCapture {
            location,
            captured_at,
            document,
        })
    }
}

/// One attempt; anything but 200 is a transient failure
async fn fetch_once(api: &dyn ApiSource, credential: &str, attempt: u32) -> Result<ApiResponse> {
    let response = api.fetch(credential).await?;
    if response.is_ok() {
        Ok(response)
    } else {
        info!(attempt, status = response.status, "API not responding");
        Err(Error::TransientApi {
            status: response.status,
        })
    }
}

impl std::fmt::Debug for CaptureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureStage")
            .field("raw_store", &self.raw_store)
            .field("retry", &self.retry)
            .field("secret_id", &self.secret_id)
            .finish_non_exhaustive()
    }
}
