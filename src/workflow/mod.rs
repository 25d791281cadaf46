//! Workflow driver
//!
//! Chains the two stages the way the scheduled state machine does:
//!
//! ```text
//! capture ──FAILED──▶ notify ─▶ FAILED
//!    │
//! SUCCEEDED
//!    ▼
//! curate ──FAILED──▶ notify ─▶ FAILED
//!    │
//! SUCCEEDED ─▶ SUCCEEDED
//! ```
//!
//! The whole run is bounded by a timeout; running out of time also notifies.

use crate::notify::{Notifier, FAILURE_MESSAGE};
use crate::stages::{CaptureStage, CurationStage, StageResult, StageStatus};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Default bound on a whole run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Result of one end-to-end run
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutcome {
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<StageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curation: Option<StageResult>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub timed_out: bool,
}

impl WorkflowOutcome {
    fn timed_out() -> Self {
        Self {
            status: StageStatus::Failed,
            capture: None,
            curation: None,
            timed_out: true,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == StageStatus::Succeeded
    }
}

/// Capture followed by curation, with failure notification
pub struct Workflow {
    capture: CaptureStage,
    curation: CurationStage,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl Workflow {
    pub fn new(capture: CaptureStage, curation: CurationStage, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            capture,
            curation,
            notifier,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn capture(&self) -> &CaptureStage {
        &self.capture
    }

    pub fn curation(&self) -> &CurationStage {
        &self.curation
    }

    /// Run both stages within the timeout
    pub async fn run(&self, event: Value) -> WorkflowOutcome {
        match tokio::time::timeout(self.timeout, self.run_stages(event)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(timeout_secs = self.timeout.as_secs(), "workflow timed out");
                self.notify(FAILURE_MESSAGE).await;
                WorkflowOutcome::timed_out()
            }
        }
    }

    async fn run_stages(&self, event: Value) -> WorkflowOutcome {
        let captured = self.capture.run(event).await;
        if !captured.is_success() {
            self.notify(captured.status.as_str()).await;
            return WorkflowOutcome {
                status: StageStatus::Failed,
                capture: Some(captured),
                curation: None,
                timed_out: false,
            };
        }

        let curated = self.curation.run(captured.to_value()).await;
        let status = curated.status;
        if status == StageStatus::Failed {
            self.notify(status.as_str()).await;
        } else {
            info!("workflow succeeded");
        }

        WorkflowOutcome {
            status,
            capture: Some(captured),
            curation: Some(curated),
            timed_out: false,
        }
    }

    /// Publish a status; a failing notifier does not change the outcome
    async fn notify(&self, status: &str) {
        if let Err(e) = self.notifier.publish(status).await {
            warn!(error = %e, "failed to publish notification");
        }
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("capture", &self.capture)
            .field("curation", &self.curation)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
