//! Error taxonomy for the reconciliation engine.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while converging a resource.
#[derive(Debug, Error)]
pub enum Error {
    /// No response obtained after exhausting connection retries.
    #[error("no response after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// The server rejected the configured credentials (401).
    #[error("authentication required: {message}")]
    Authentication { message: String },

    /// The configured account lacks permission for the operation (403).
    #[error("insufficient permissions: {message}")]
    Authorization { message: String },

    /// The server rejected the request body (400).
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// An identity collision, or the target disappeared mid-reconcile.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The server reported itself unavailable (500/503).
    #[error("service unavailable (http {status}): {message}")]
    ServiceUnavailable { status: u16, message: String },

    /// Any other unexpected status.
    #[error("unexpected server response (http {status}): {message}")]
    UnknownServer { status: u16, message: String },

    /// The desired spec is missing something the descriptor requires.
    #[error("invalid desired spec: {0}")]
    InvalidSpec(String),

    /// The client configuration could not be applied.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// Map a received error status onto the taxonomy. Not-found is call-site
    /// dependent and must be handled before reaching here.
    pub fn from_status(status: StatusCode, body: &Value, what: &str) -> Self {
        let message = format!("{what}: {}", remote_message(body));
        match status.as_u16() {
            400 => Error::Validation { message },
            401 => Error::Authentication { message },
            403 => Error::Authorization { message },
            500 | 503 => Error::ServiceUnavailable {
                status: status.as_u16(),
                message,
            },
            other => Error::UnknownServer {
                status: other,
                message,
            },
        }
    }
}

/// Extract the most useful diagnostic from a parsed response body.
pub fn remote_message(body: &Value) -> String {
    if let Some(msg) = body.get("message").and_then(Value::as_str) {
        return msg.to_string();
    }
    if let Some(text) = body.get("content").and_then(Value::as_str) {
        return text.to_string();
    }
    if let Some(inner) = body.get("json") {
        return inner.to_string();
    }
    body.to_string()
}

pub type Result<T> = std::result::Result<T, Error>;
