//! HTTP client construction and response classification.

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::client::ClientError;
use crate::options::ClientConfig;

const USER_AGENT: &str = concat!("waygpt-rust/", env!("CARGO_PKG_VERSION"));

/// Build a configured HTTP client.
///
/// Only the connect phase is bounded here; per-attempt timeouts are set on
/// each request so streaming bodies are not cut off.
pub fn build_http_client(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut builder = Client::builder()
        .connect_timeout(config.timeout())
        .user_agent(USER_AGENT);

    if let Some(proxy_url) = config.proxy() {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| ClientError::Config(format!("Invalid proxy '{}': {}", proxy_url, e)))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Add configured extra headers to a request.
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &HashMap<String, String>,
) -> RequestBuilder {
    for (key, value) in extra_headers {
        request = request.header(key, value);
    }
    request
}

/// Pass successful responses through; turn status >= 400 into [`ClientError::Api`].
pub async fn error_for_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.as_u16() < 400 {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "request failed");
    Err(api_error(status.as_u16(), body))
}

/// Build an API error from a status and raw body.
///
/// The message is taken from the JSON `detail` field, then `message`,
/// falling back to `HTTP {status}`.
pub fn api_error(status: u16, body: String) -> ClientError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| error_message(&json))
        .unwrap_or_else(|| format!("HTTP {}", status));

    ClientError::Api {
        status,
        message,
        body: Some(body).filter(|b| !b.is_empty()),
    }
}

fn error_message(body: &Value) -> Option<String> {
    ["detail", "message"].iter().find_map(|field| match body.get(field)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}
