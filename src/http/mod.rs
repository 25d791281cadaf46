//! HTTP module
//!
//! Weather API client plus the fixed-delay retry used around it.
//!
//! # Features
//!
//! - **API Source**: trait seam over the single GET endpoint
//! - **Bounded Retries**: fixed attempts with a fixed delay, no backoff
//! - **Injectable Waiting**: `Sleeper` lets tests skip real delays

mod client;
mod retry;

pub use client::{ApiResponse, ApiSource, WeatherApiClient};
pub use retry::{RecordingSleeper, Retry, RetryPolicy, Sleeper, TokioSleeper};
