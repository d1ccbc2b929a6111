//! JSON envelope used uniformly by the remote API.
//!
//! Every response body is `{ code, message?, data? }` where `code ==
//! "200"` signals logical success regardless of HTTP status. The client
//! strips the envelope and hands callers only `data`.

use serde::Deserialize;

use crate::error::ApiError;

/// Outer response wrapper of the remote API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    /// Logical status code as a string; `"200"` means success.
    pub code: String,
    /// Human-readable message accompanying the code.
    #[serde(default)]
    pub message: Option<String>,
    /// Variant-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ApiEnvelope {
    /// Returns `true` when the envelope reports logical success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == "200"
    }

    /// Strips the envelope, converting logical failures into the
    /// normalized error shape.
    ///
    /// Envelope code `"401"` converges on [`ApiError::Unauthenticated`]
    /// so callers see one variant for both transports of that signal.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Business`] (or `Unauthenticated`) when the
    /// code is not `"200"`.
    pub fn into_data(self) -> Result<serde_json::Value, ApiError> {
        if self.is_success() {
            return Ok(self.data);
        }
        if self.code == "401" {
            return Err(ApiError::Unauthenticated);
        }
        Err(ApiError::Business {
            message: self
                .message
                .unwrap_or_else(|| format!("request failed ({})", self.code)),
            code: self.code,
        })
    }
}
