//! Client configuration types.

use std::time::Duration;

/// Bounds for re-issuing a request after a connection-level failure.
///
/// Only failures where no HTTP status was obtained are retried; a received
/// error status stops retrying immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Sleep between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// A single attempt with no delay.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }
}

/// Connection settings for the Nexus administrative API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Nexus instance, e.g. `https://nexus.example.com`.
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Verify the server TLS certificate. Disable only for test instances.
    pub verify_tls: bool,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            verify_tls: true,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }
}
