//! Secret store
//!
//! The capture stage needs one credential, looked up by a fixed identifier.
//! Stores are read-only.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Read-only lookup of secret strings
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the secret stored under `id`
    async fn get_secret(&self, id: &str) -> Result<String>;
}

/// Secrets read from environment variables
///
/// The identifier is upper-cased and every character outside `[A-Z0-9]`
/// becomes `_`, so `tdf_test/api_key` reads `TDF_TEST_API_KEY`.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    /// Environment variable consulted for `id`
    pub fn var_name(id: &str) -> String {
        id.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, id: &str) -> Result<String> {
        let var = Self::var_name(id);
        match std::env::var(&var) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) => Err(Error::missing_credential(id, format!("{var} is empty"))),
            Err(e) => Err(Error::missing_credential(id, format!("{var}: {e}"))),
        }
    }
}

/// Fixed in-memory secrets
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret
    #[must_use]
    pub fn with_secret(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(id.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(&self, id: &str) -> Result<String> {
        self.secrets
            .get(id)
            .cloned()
            .ok_or_else(|| Error::missing_credential(id, "no such secret"))
    }
}
