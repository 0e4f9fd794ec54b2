//! Connection settings for [`HttpCrmClient`](crate::HttpCrmClient).

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://app.tablecrm.com/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub const API_URL_VAR: &str = "CRMDESK_API_URL";
pub const TIMEOUT_VAR: &str = "CRMDESK_HTTP_TIMEOUT_SECS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// `base_url` must be absolute http(s); a trailing slash is dropped.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: base_url,
                reason: "scheme must be http or https".to_string(),
            });
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Read `CRMDESK_API_URL` and `CRMDESK_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary source.
    ///
    /// An unparsable timeout falls back to the default with a warning; an
    /// invalid URL is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match lookup(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(var = TIMEOUT_VAR, value = %raw, "ignoring unparsable timeout");
                    DEFAULT_TIMEOUT
                }
            },
        };

        Self::new(base_url.trim(), timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `{base}/{endpoint}/`, the trailing slash the API expects.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}/", self.base_url, endpoint)
    }
}
