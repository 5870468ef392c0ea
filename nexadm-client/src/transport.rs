//! Authenticated HTTP transport with bounded connection retry.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// HTTP client for the Nexus administrative API.
///
/// Every request carries a Basic-authentication header. Connection-level
/// failures (no status obtained) are retried up to the configured attempt
/// count; any received status, including 4xx/5xx, is returned to the caller
/// without retrying.
pub struct HttpClient {
    http: Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Issue one API call and return the received status with the parsed body.
    pub async fn send(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value)> {
        self.send_with_headers(path, method, body, None).await
    }

    /// Like [`Self::send`], with caller-supplied headers. A JSON body sets
    /// `Content-Type: application/json` unless the caller's headers carry
    /// their own content type.
    pub async fn send_with_headers(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        headers: Option<HeaderMap>,
    ) -> Result<(StatusCode, Value)> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        // At least one attempt, regardless of how the policy is configured.
        let max_attempts = self.config.retry.max_attempts.max(1);

        let mut attempt = 1u32;
        let response = loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .basic_auth(&self.config.username, Some(&self.config.password));
            if let Some(body) = body {
                request = request.json(body);
            }
            if let Some(headers) = &headers {
                request = request.headers(headers.clone());
            }

            match request.send().await {
                Ok(response) => break response,
                Err(source) if attempt < max_attempts => {
                    warn!(
                        %url,
                        attempt,
                        max_attempts,
                        error = %source,
                        "connection failed, retrying after delay"
                    );
                    tokio::time::sleep(self.config.retry.delay).await;
                    attempt += 1;
                }
                Err(source) => {
                    return Err(Error::Transport {
                        attempts: attempt,
                        source,
                    });
                }
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(|source| Error::Transport {
            attempts: attempt,
            source,
        })?;
        debug!(%url, method = %method, status = status.as_u16(), "request completed");
        Ok((status, parse_body(&text)))
    }
}

/// Parse a response body into a mapping.
///
/// JSON objects pass through unchanged; other JSON values are wrapped under
/// `"json"`, unparseable text under `"content"`, and an empty body yields an
/// empty mapping.
fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(other) => {
            let mut map = Map::new();
            map.insert("json".to_string(), other);
            Value::Object(map)
        }
        Err(_) => {
            let mut map = Map::new();
            map.insert("content".to_string(), Value::String(text.to_string()));
            Value::Object(map)
        }
    }
}
