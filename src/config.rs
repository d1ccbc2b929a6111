//! Client configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Defaults point at a local development
//! backend.

use std::time::Duration;

/// Top-level client configuration.
///
/// Loaded once at startup via [`ClientConfig::from_env`], or constructed
/// directly in tests.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote HTTP API (e.g. `http://localhost:8080/api`).
    pub api_base_url: String,

    /// URL of the realtime WebSocket endpoint (e.g. `ws://localhost:11277/ws`).
    pub ws_url: String,

    /// Per-request HTTP timeout in milliseconds.
    pub http_timeout_ms: u64,

    /// Maximum number of retries for a retryable failure (attempts = retries + 1).
    pub retry_max: u32,

    /// Fixed delay between retry attempts in milliseconds.
    pub retry_delay_ms: u64,

    /// Capacity of each realtime broadcast channel.
    pub channel_capacity: usize,

    /// Path of the SQLite file backing the durable key/value store.
    pub store_path: String,
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/api".to_string());

        let ws_url =
            std::env::var("WS_URL").unwrap_or_else(|_| "ws://localhost:11277/ws".to_string());

        let http_timeout_ms = parse_env("HTTP_TIMEOUT_MS", 10_000);
        let retry_max = parse_env("API_RETRY_MAX", 2);
        let retry_delay_ms = parse_env("API_RETRY_DELAY_MS", 1_000);
        let channel_capacity = parse_env("EVENT_CHANNEL_CAPACITY", 1_024);

        let store_path =
            std::env::var("STORE_PATH").unwrap_or_else(|_| "jaseats-client.db".to_string());

        Self {
            api_base_url,
            ws_url,
            http_timeout_ms,
            retry_max,
            retry_delay_ms,
            channel_capacity,
            store_path,
        }
    }

    /// Per-request HTTP timeout as a [`Duration`].
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// Inter-retry delay as a [`Duration`].
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            ws_url: "ws://localhost:11277/ws".to_string(),
            http_timeout_ms: 10_000,
            retry_max: 2,
            retry_delay_ms: 1_000,
            channel_capacity: 1_024,
            store_path: "jaseats-client.db".to_string(),
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
