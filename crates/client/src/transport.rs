//! HTTP transport for the trialsync API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use trialsync_core::resource::{Envelope, Method, Transport, TransportError, TransportRequest};

use crate::config::Config;

/// `Transport` implementation backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

/// Body shape of an error reply. Every field is optional since proxies and
/// crashed handlers do not always answer with an envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_message: Option<String>,
    status_text: Option<String>,
    message: Option<String>,
}

impl HttpTransport {
    /// Create a new transport with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create a transport from configuration, applying the request timeout.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(network_error)?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: TransportRequest) -> Result<Envelope<Value>, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, self.url(&request.url));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(network_error)?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        if body.is_empty() {
            return Ok(Envelope::success(status.as_u16(), Value::Null));
        }
        serde_json::from_slice(&body)
            .map_err(|e| TransportError::Network(format!("Invalid response envelope: {e}")))
    }
}

fn network_error(error: reqwest::Error) -> TransportError {
    TransportError::Network(error.to_string())
}

/// Builds the structured error for a non-2xx response.
fn status_error(status: StatusCode, body: &[u8]) -> TransportError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let status_message = parsed
        .status_message
        .or(parsed.status_text)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

    TransportError::Status {
        status_code: status.as_u16(),
        status_message,
        message: parsed.message.filter(|m| !m.is_empty()),
    }
}
