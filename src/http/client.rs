//! Weather API client
//!
//! One fixed GET endpoint. The credential travels as a query parameter
//! next to the fixed location and air-quality parameters.

use crate::config::ApiConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Status and body of one API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only 200 counts as a capture
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Source of raw API responses
#[async_trait]
pub trait ApiSource: Send + Sync {
    /// Issue one request with the given credential
    async fn fetch(&self, credential: &str) -> Result<ApiResponse>;
}

/// HTTP client for the current-weather endpoint
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: Client,
    endpoint: String,
    key_param: String,
    query: Vec<(String, String)>,
}

impl WeatherApiClient {
    /// Create a client from API settings
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            key_param: config.key_param.clone(),
            query: vec![
                ("q".to_string(), config.location.clone()),
                ("aqi".to_string(), config.aqi.clone()),
            ],
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ApiSource for WeatherApiClient {
    async fn fetch(&self, credential: &str) -> Result<ApiResponse> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[(self.key_param.as_str(), credential)])
            .query(&self.query)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(endpoint = %self.endpoint, status, bytes = body.len(), "API responded");

        Ok(ApiResponse { status, body })
    }
}
