//! Client configuration.

use std::time::Duration;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default API prefix.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend address (scheme, host, port).
    pub base_url: String,

    /// Path prefix of the versioned API.
    pub api_prefix: String,

    /// Period between poll ticks.
    pub poll_interval: Duration,

    /// Timeout applied to every request.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Default configuration pointed at another backend.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}
