//! Client configuration.
//!
//! Configuration is either built in code or read from the environment:
//!
//! - `THE_ONE_API_TOKEN` (required): bearer token issued by the-one-api.dev
//! - `THE_ONE_API_BASE_URL`: overrides `https://the-one-api.dev/v2`
//! - `THE_ONE_API_TIMEOUT_SECS`: global request timeout in whole seconds

use std::fmt;
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Base URL of the public service.
pub const DEFAULT_BASE_URL: &str = "https://the-one-api.dev/v2";

const TOKEN_VAR: &str = "THE_ONE_API_TOKEN";
const BASE_URL_VAR: &str = "THE_ONE_API_BASE_URL";
const TIMEOUT_VAR: &str = "THE_ONE_API_TIMEOUT_SECS";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub token: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(TOKEN_VAR).ok_or(ApiError::MissingEnv(TOKEN_VAR))?;
        let mut config = Self::new(token);

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| ApiError::InvalidEnv {
                var: TIMEOUT_VAR,
                value: raw.clone(),
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

// Keeps the token out of logs and panic messages.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
