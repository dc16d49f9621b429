use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FigmaError, Result};
use crate::helpers::RetryPolicy;

pub const DEFAULT_BASE_URL: &str = "https://api.figma.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const TOKEN_ENV: &str = "FIGMA_TOKEN";
pub const OAUTH_TOKEN_ENV: &str = "FIGMA_OAUTH_TOKEN";

/// How requests authenticate.
#[derive(Clone, PartialEq, Eq)]
pub enum FigmaAuth {
    /// Sent as `X-Figma-Token`.
    PersonalToken(String),
    /// Sent as `Authorization: Bearer`.
    OAuth(String),
}

impl std::fmt::Debug for FigmaAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FigmaAuth::PersonalToken(_) => f.write_str("PersonalToken(***)"),
            FigmaAuth::OAuth(_) => f.write_str("OAuth(***)"),
        }
    }
}

impl FigmaAuth {
    /// `FIGMA_TOKEN` wins over `FIGMA_OAUTH_TOKEN`; blank values are skipped.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_blank = |key| lookup(key).filter(|v| !v.trim().is_empty());
        non_blank(TOKEN_ENV)
            .map(FigmaAuth::PersonalToken)
            .or_else(|| non_blank(OAUTH_TOKEN_ENV).map(FigmaAuth::OAuth))
    }

    pub fn token(&self) -> &str {
        match self {
            FigmaAuth::PersonalToken(token) | FigmaAuth::OAuth(token) => token,
        }
    }

    /// Header name and value carrying the credential.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            FigmaAuth::PersonalToken(token) => ("X-Figma-Token", token.clone()),
            FigmaAuth::OAuth(token) => ("Authorization", format!("Bearer {}", token)),
        }
    }
}

/// Everything a [`FigmaClient`](crate::FigmaClient) needs.
#[derive(Debug, Clone)]
pub struct FigmaClientConfig {
    pub auth: FigmaAuth,
    pub base_url: Url,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl FigmaClientConfig {
    /// Personal access token with default base URL, timeout and retry policy.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_auth(FigmaAuth::PersonalToken(token.into()))
    }

    pub fn with_auth(auth: FigmaAuth) -> Self {
        Self {
            auth,
            base_url: default_base_url(),
            timeout: Some(DEFAULT_TIMEOUT),
            retry: RetryPolicy::default(),
        }
    }

    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base url is valid"))
}

/// File-backed settings (`figkit.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api: ApiSettings,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| FigmaError::config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FigmaError::config(format!(
                "api.base_url must be http(s), got {}",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(FigmaError::config("api.base_url cannot carry a path"));
        }
        if self.api.timeout.is_zero() {
            return Err(FigmaError::config("api.timeout must be greater than zero"));
        }
        if self.retry.max_retries == 0 {
            return Err(FigmaError::config("retry.max_retries must be at least 1"));
        }
        if self.retry.base_delay > self.retry.max_delay {
            return Err(FigmaError::config(
                "retry.base_delay must not exceed retry.max_delay",
            ));
        }
        Ok(())
    }

    pub fn client_config(&self, auth: FigmaAuth) -> Result<FigmaClientConfig> {
        let base_url = Url::parse(&self.api.base_url)?;
        Ok(FigmaClientConfig::with_auth(auth)
            .base_url(base_url)
            .timeout(Some(self.api.timeout))
            .retry(self.retry))
    }
}
