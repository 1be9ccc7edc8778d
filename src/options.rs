//! Client configuration with environment fallbacks.

use reqwest::header::HeaderValue;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::time::Duration;

use crate::client::ClientError;

pub const DEFAULT_API_URL: &str = "https://app.waygpt.ru";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

pub const ENV_API_URL: &str = "WAYGPT_API_URL";
pub const ENV_PROJECT_KEY: &str = "WAYGPT_PROJECT_KEY";
pub const ENV_PROJECT_ID: &str = "WAYGPT_PROJECT_ID";
pub const ENV_HMAC_SECRET: &str = "WAYGPT_HMAC_SECRET";
pub const ENV_USE_HMAC: &str = "WAYGPT_USE_HMAC";

/// A secret string type for sensitive data like project keys.
/// Prevents accidental logging or display of secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret string.
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

/// Resolved, validated configuration of a [`WayGptClient`](crate::WayGptClient).
///
/// Built through [`ClientConfig::builder`]; immutable afterwards.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use waygpt::options::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("https://app.waygpt.ru/")
///     .project_key("sk_live_example")
///     .timeout(Duration::from_secs(30))
///     .build_with(|_| None)
///     .unwrap();
///
/// assert_eq!(config.base_url(), "https://app.waygpt.ru");
/// assert!(!config.use_hmac());
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    project_key: SecretString,
    project_id: Option<String>,
    hmac_secret: Option<SecretString>,
    use_hmac: bool,
    timeout: Duration,
    max_retries: u32,
    retry_base_delay: Duration,
    proxy: Option<String>,
    extra_headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Start building a configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Resolve a configuration purely from `WAYGPT_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::builder().build()
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn project_key(&self) -> &SecretString {
        &self.project_key
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    pub fn hmac_secret(&self) -> Option<&SecretString> {
        self.hmac_secret.as_ref()
    }

    /// Whether project-key requests carry HMAC signature headers.
    pub fn use_hmac(&self) -> bool {
        self.use_hmac
    }

    /// Timeout applied to each attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Unit of the exponential backoff; retry `n` waits `base * 2^n`.
    pub fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn extra_headers(&self) -> &HashMap<String, String> {
        &self.extra_headers
    }
}

/// Builder for [`ClientConfig`].
///
/// Each field resolves as: explicit value, then the matching `WAYGPT_*`
/// environment variable, then the built-in default.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    project_key: Option<SecretString>,
    project_id: Option<String>,
    hmac_secret: Option<SecretString>,
    use_hmac: Option<bool>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_base_delay: Option<Duration>,
    proxy: Option<String>,
    extra_headers: HashMap<String, String>,
}

impl ClientConfigBuilder {
    /// Set the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the project key sent as `x-project-key`.
    pub fn project_key(mut self, project_key: impl Into<SecretString>) -> Self {
        self.project_key = Some(project_key.into());
        self
    }

    /// Set the project ID used in the HMAC canonical string.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the shared HMAC secret.
    pub fn hmac_secret(mut self, hmac_secret: impl Into<SecretString>) -> Self {
        self.hmac_secret = Some(hmac_secret.into());
        self
    }

    /// Enable or disable HMAC signing. An explicit value overrides `WAYGPT_USE_HMAC`.
    pub fn use_hmac(mut self, use_hmac: bool) -> Self {
        self.use_hmac = Some(use_hmac);
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set how many times a retryable failure is retried.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Set the backoff unit.
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    /// Set the proxy URL.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add a single extra header sent with every request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Resolve against the process environment and validate.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        self.build_with(|key| std::env::var(key).ok())
    }

    /// Resolve against a custom variable lookup and validate.
    pub fn build_with<F>(self, lookup: F) -> Result<ClientConfig, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = self
            .base_url
            .or_else(|| env(ENV_API_URL))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;

        let project_key = self
            .project_key
            .or_else(|| env(ENV_PROJECT_KEY).map(SecretString::new))
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "project key is required; pass it explicitly or set {}",
                    ENV_PROJECT_KEY
                ))
            })?;
        HeaderValue::from_str(project_key.expose_secret())
            .map_err(|_| ClientError::Config("project key contains invalid characters".to_string()))?;

        let project_id = self
            .project_id
            .or_else(|| env(ENV_PROJECT_ID))
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        let hmac_secret = self
            .hmac_secret
            .or_else(|| env(ENV_HMAC_SECRET).map(SecretString::new))
            .filter(|secret| !secret.expose_secret().trim().is_empty());
        let use_hmac = self.use_hmac.unwrap_or_else(|| {
            env(ENV_USE_HMAC).is_some_and(|flag| flag.trim().eq_ignore_ascii_case("true"))
        });

        if use_hmac {
            if project_id.is_none() {
                return Err(ClientError::Config(
                    "project ID is required when HMAC signing is enabled".to_string(),
                ));
            }
            if hmac_secret.is_none() {
                return Err(ClientError::Config(
                    "HMAC secret is required when HMAC signing is enabled".to_string(),
                ));
            }
        }

        Ok(ClientConfig {
            base_url,
            project_key,
            project_id,
            hmac_secret,
            use_hmac,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_base_delay: self.retry_base_delay.unwrap_or(DEFAULT_RETRY_BASE_DELAY),
            proxy: self.proxy,
            extra_headers: self.extra_headers,
        })
    }
}
