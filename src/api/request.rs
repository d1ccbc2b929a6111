//! Request descriptor: what to send, plus per-call retry bookkeeping.

use reqwest::Method;
use tokio_util::sync::CancellationToken;

/// Describes one logical API call.
///
/// The retry counter lives here so it cannot leak across independent
/// calls: each descriptor starts at zero and is consumed by a single
/// [`super::ApiClient::dispatch`] invocation.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the configured base URL (e.g. `/v1/recipe/today`).
    pub path: String,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// JSON request body, if any.
    pub body: Option<serde_json::Value>,
    retry_count: u32,
    cancel: Option<CancellationToken>,
}

impl RequestDescriptor {
    /// Creates a descriptor with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            retry_count: 0,
            cancel: None,
        }
    }

    /// GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut descriptor = Self::new(Method::POST, path);
        descriptor.body = Some(body);
        descriptor
    }

    /// PUT request with a JSON body.
    #[must_use]
    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        let mut descriptor = Self::new(Method::PUT, path);
        descriptor.body = Some(body);
        descriptor
    }

    /// DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Adds a query string pair.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attaches a cancellation handle. Cancelling it aborts the in-flight
    /// transport wait and short-circuits pending retries.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Number of retries performed so far for this logical call.
    #[must_use]
    pub const fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Records one retry. Monotonic; only the retryable failure path
    /// calls this.
    pub(crate) fn record_retry(&mut self) {
        self.retry_count += 1;
    }

    /// Returns the cancellation handle, if one was attached.
    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }
}
