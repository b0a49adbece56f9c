//! Configuration options for the CCL Prep client

use std::time::Duration;

/// Configuration options for the CCL Prep client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Path prefix every endpoint is mounted under
    pub api_prefix: String,

    /// How long a cached snapshot is considered fresh
    pub stale_time: Duration,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Whether a failed query fetch is retried once automatically
    pub retry_once: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_prefix: "/api/v1".to_string(),
            stale_time: Duration::from_secs(60),
            request_timeout: Some(Duration::from_secs(30)),
            retry_once: true,
        }
    }
}

impl ClientOptions {
    /// Set the API path prefix
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.to_string();
        self
    }

    /// Set the cache freshness window
    pub fn with_stale_time(mut self, value: Duration) -> Self {
        self.stale_time = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether a failed query fetch is retried once
    pub fn with_retry_once(mut self, value: bool) -> Self {
        self.retry_once = value;
        self
    }
}
