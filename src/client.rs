//! Core client type, request plumbing and error types.

use bytes::Bytes;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::http::{add_extra_headers, build_http_client, error_for_status};
use crate::options::ClientConfig;
use crate::retry::RetryPolicy;
use crate::signer::RequestSigner;

pub const PROJECT_KEY_HEADER: &str = "x-project-key";

/// Errors that can occur during client operations.
///
/// `Validation` and `Config` are raised locally before any network call.
/// `Network` and `Api` come from the transport; the retryable subset
/// (network failures, 429 and 5xx) has already been retried by the time
/// it reaches the caller.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human readable message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            ClientError::Validation(message) | ClientError::Config(message) => message.clone(),
            ClientError::Network { message, .. } | ClientError::Api { message, .. } => {
                message.clone()
            }
            ClientError::Parse(e) => e.to_string(),
        }
    }

    /// Raw response body of a server-reported failure.
    pub fn body(&self) -> Option<&str> {
        match self {
            ClientError::Api { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    /// Whether the failure is transient: network errors, 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network { .. } => true,
            ClientError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        ClientError::Api {
            status: 404,
            message: message.into(),
            body: None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            return ClientError::Config(e.to_string());
        }
        ClientError::Network {
            message: e.to_string(),
            source: Some(e),
        }
    }
}

/// How a request proves who it is.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Auth<'a> {
    /// `x-project-key`, plus HMAC headers when signing is enabled.
    ProjectKey,
    /// `Authorization: Bearer <jwt>` for the Client API.
    Bearer(&'a str),
    /// No credentials (login).
    Anonymous,
}

/// Request body, serialized once so every attempt sends and signs the same bytes.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Empty,
    Json(Bytes),
    Form(Vec<(&'static str, String)>),
}

impl Payload {
    pub(crate) fn json<T: Serialize>(value: &T) -> Result<Self, ClientError> {
        Ok(Payload::Json(Bytes::from(serde_json::to_vec(value)?)))
    }

    /// Bytes covered by the HMAC body hash.
    fn signed_bytes(&self) -> &[u8] {
        match self {
            Payload::Json(bytes) => bytes,
            Payload::Empty | Payload::Form(_) => &[],
        }
    }
}

/// Client for the WayGPT API and the JWT-authenticated Client API.
///
/// Cheap to clone; clones share the connection pool and configuration.
/// Operations are grouped in the [`api`](crate::api) modules.
///
/// # Example
/// ```no_run
/// use waygpt::model::{ChatCompletionRequest, ChatMessage};
/// use waygpt::options::ClientConfig;
/// use waygpt::WayGptClient;
///
/// # async fn run() -> Result<(), waygpt::ClientError> {
/// let config = ClientConfig::builder().project_key("sk_live_...").build()?;
/// let client = WayGptClient::new(config)?;
///
/// let request = ChatCompletionRequest::new(vec![ChatMessage::user("Hello!")]);
/// let completion = client.chat_completions(request).await?;
/// println!("{:?}", completion.content());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WayGptClient {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
    retry: RetryPolicy,
    signer: Option<RequestSigner>,
}

impl WayGptClient {
    /// Create a client from a validated configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = build_http_client(&config)?;
        let retry = RetryPolicy::new(config.max_retries(), config.retry_base_delay());

        let signer = if config.use_hmac() {
            match (config.project_id(), config.hmac_secret()) {
                (Some(project_id), Some(secret)) => {
                    Some(RequestSigner::new(project_id, secret.clone()))
                }
                _ => {
                    return Err(ClientError::Config(
                        "HMAC signing requires both project ID and secret".to_string(),
                    ))
                }
            }
        } else {
            None
        };

        debug!(
            base_url = config.base_url(),
            hmac = config.use_hmac(),
            max_retries = config.max_retries(),
            "created WayGPT client"
        );

        Ok(Self {
            config: Arc::new(config),
            http,
            retry,
            signer,
        })
    }

    /// Create a client configured entirely from `WAYGPT_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request with retry and return the successful response.
    ///
    /// With `streaming` set, only the wait for response headers is bounded
    /// by the timeout; the body is left for the caller to consume.
    pub(crate) async fn send(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload,
        auth: Auth<'_>,
        streaming: bool,
    ) -> Result<reqwest::Response, ClientError> {
        let url = format!("{}{}", self.config.base_url(), endpoint);
        debug!(%method, endpoint, streaming, "sending request");

        self.retry
            .execute(|| self.attempt(&method, &url, endpoint, &payload, auth, streaming))
            .await
    }

    /// Send a request and decode the JSON response body.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload,
        auth: Auth<'_>,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.config.base_url(), endpoint);
        debug!(%method, endpoint, "sending request");

        // The body read shares the attempt so a truncated body is retried too.
        let (method, url, payload) = (&method, url.as_str(), &payload);
        let body = self
            .retry
            .execute(|| async move {
                let response = self
                    .attempt(method, url, endpoint, payload, auth, false)
                    .await?;
                Ok(response.bytes().await?)
            })
            .await?;
        decode_body(&body)
    }

    async fn attempt(
        &self,
        method: &Method,
        url: &str,
        endpoint: &str,
        payload: &Payload,
        auth: Auth<'_>,
        streaming: bool,
    ) -> Result<reqwest::Response, ClientError> {
        let mut req = self.http.request(method.clone(), url);
        req = add_extra_headers(req, self.config.extra_headers());
        req = self.authorize(req, method, endpoint, payload, auth)?;

        req = match payload {
            Payload::Empty => req,
            Payload::Json(bytes) => req
                .header(CONTENT_TYPE, "application/json")
                .body(bytes.clone()),
            Payload::Form(fields) => req.form(fields),
        };

        let response = if streaming {
            tokio::time::timeout(self.config.timeout(), req.send())
                .await
                .map_err(|_| ClientError::Network {
                    message: format!(
                        "timed out after {:?} waiting for response headers",
                        self.config.timeout()
                    ),
                    source: None,
                })??
        } else {
            req.timeout(self.config.timeout()).send().await?
        };

        error_for_status(response).await
    }

    fn authorize(
        &self,
        req: RequestBuilder,
        method: &Method,
        endpoint: &str,
        payload: &Payload,
        auth: Auth<'_>,
    ) -> Result<RequestBuilder, ClientError> {
        match auth {
            Auth::ProjectKey => {
                let req = req.header(
                    PROJECT_KEY_HEADER,
                    self.config.project_key().expose_secret(),
                );
                match &self.signer {
                    Some(signer) => {
                        let headers =
                            signer.sign_now(method.as_str(), endpoint, payload.signed_bytes())?;
                        Ok(headers.apply(req))
                    }
                    None => Ok(req),
                }
            }
            Auth::Bearer(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ClientError::Validation("invalid JWT token".to_string()))?;
                Ok(req.header(AUTHORIZATION, value))
            }
            Auth::Anonymous => Ok(req),
        }
    }
}

/// Decode a successful response body. An empty body (e.g. `204 No Content`)
/// decodes as JSON `null`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Trimmed value of a required path identifier.
///
/// Identifiers go into the URL and the signed path verbatim, so anything
/// outside the unreserved URL characters is rejected.
pub(crate) fn path_segment<'a>(value: &'a str, field: &str) -> Result<&'a str, ClientError> {
    let segment = require(value, field)?;
    let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
    if !segment.chars().all(unreserved) || segment == "." || segment == ".." {
        return Err(ClientError::Validation(format!(
            "{} contains characters not allowed in a URL path",
            field
        )));
    }
    Ok(segment)
}

/// Trimmed value of a required string argument.
pub(crate) fn require<'a>(value: &'a str, field: &str) -> Result<&'a str, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}
