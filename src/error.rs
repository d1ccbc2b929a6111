//! Client error types with failure classification.
//!
//! [`ApiError`] is the single normalized shape every API call site
//! receives, regardless of the underlying failure cause. No transport
//! exception ever escapes the client raw: every failure path resolves to
//! exactly one [`ApiError`] per logical call.

use serde::Serialize;

/// Normalized error surfaced by the API gateway client.
///
/// # Classification
///
/// | Variant         | Cause                              | Retryable |
/// |-----------------|------------------------------------|-----------|
/// | `Timeout`       | No response before the deadline    | yes       |
/// | `Transport`     | Connect failure / aborted transfer | yes       |
/// | `ServerFault`   | HTTP status ≥ 500                  | yes       |
/// | `ClientFault`   | HTTP status 400–499 (except 401)   | no        |
/// | `Unauthenticated` | HTTP 401 or envelope code "401"  | no        |
/// | `Business`      | Envelope code ≠ "200" on HTTP 200  | no        |
/// | `Decode`        | Response body failed to parse      | no        |
/// | `Cancelled`     | Caller cancelled the dispatch      | no        |
/// | `Internal`      | Client-side construction failure   | no        |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response was received before the request deadline.
    #[error("request timed out")]
    Timeout,

    /// The transport failed before a response arrived (connect refused,
    /// aborted transfer, DNS failure).
    #[error("transport failure: {message}")]
    Transport {
        /// Transport diagnostic from the HTTP stack.
        message: String,
        /// Short transport code when one can be derived (e.g. `"connect"`).
        code: Option<&'static str>,
    },

    /// The server answered with a 5xx status.
    #[error("server fault ({status})")]
    ServerFault {
        /// HTTP status code.
        status: u16,
        /// Raw response body, when one was received.
        body: Option<String>,
    },

    /// The server answered with a 4xx status other than 401.
    #[error("client fault ({status})")]
    ClientFault {
        /// HTTP status code.
        status: u16,
        /// Raw response body, when one was received.
        body: Option<String>,
    },

    /// The session credential was missing, expired, or rejected.
    #[error("authentication required")]
    Unauthenticated,

    /// The API envelope reported a logical failure (`code` ≠ `"200"`).
    #[error("{message}")]
    Business {
        /// Envelope code as returned by the server.
        code: String,
        /// Envelope message, or a generic fallback.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("malformed response body: {0}")]
    Decode(String),

    /// The caller cancelled the dispatch via its cancellation handle.
    #[error("request cancelled")]
    Cancelled,

    /// Client-side failure unrelated to the remote service.
    #[error("internal client error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns `true` if the failure is transient and worth retrying.
    ///
    /// Only transport-level failures and server faults qualify; client
    /// faults, logical failures, and cancellations surface immediately.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::Transport { .. } | Self::ServerFault { .. }
        )
    }

    /// Returns the HTTP status associated with this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServerFault { status, .. } | Self::ClientFault { status, .. } => Some(*status),
            Self::Unauthenticated => Some(401),
            _ => None,
        }
    }

    /// Returns the transport code for transport-level failures.
    #[must_use]
    pub const fn transport_code(&self) -> Option<&'static str> {
        match self {
            Self::Timeout => Some("timeout"),
            Self::Transport { code, .. } => *code,
            _ => None,
        }
    }

    /// Returns a short message suitable for direct display (toast/snackbar).
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Timeout | Self::Transport { .. } => "network connection failed".to_string(),
            Self::ServerFault { status: 503, .. } => "service under maintenance".to_string(),
            Self::ServerFault { status: 500, .. } => "server error".to_string(),
            Self::ServerFault { status, .. } => format!("request failed ({status})"),
            Self::ClientFault { status: 400, .. } => "bad request".to_string(),
            Self::ClientFault { status: 403, .. } => "forbidden".to_string(),
            Self::ClientFault { status: 404, .. } => "resource not found".to_string(),
            Self::ClientFault { status, .. } => format!("request failed ({status})"),
            Self::Unauthenticated => "login expired, please sign in again".to_string(),
            Self::Business { message, .. } => message.clone(),
            Self::Decode(_) => "malformed server response".to_string(),
            Self::Cancelled => "request cancelled".to_string(),
            Self::Internal(_) => "client error".to_string(),
        }
    }

    /// Classifies an HTTP failure status into the matching variant.
    #[must_use]
    pub fn from_status(status: u16, body: Option<String>) -> Self {
        match status {
            401 => Self::Unauthenticated,
            400..=499 => Self::ClientFault { status, body },
            _ => Self::ServerFault { status, body },
        }
    }

    /// Converts this error into the serializable shape handed to UI layers.
    #[must_use]
    pub fn to_normalized(&self) -> NormalizedError {
        NormalizedError {
            kind: self.kind_str(),
            message: self.user_message(),
            status: self.status(),
            data: match self {
                Self::ServerFault { body, .. } | Self::ClientFault { body, .. } => body.clone(),
                _ => None,
            },
            code: match self {
                Self::Timeout => Some("timeout".to_string()),
                Self::Transport { code, .. } => code.map(str::to_string),
                Self::Business { code, .. } => Some(code.clone()),
                _ => None,
            },
        }
    }

    /// Returns the classification tag as a static string slice.
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Timeout => "network_timeout",
            Self::Transport { .. } => "transport",
            Self::ServerFault { .. } => "server_error",
            Self::ClientFault { .. } => "client_error",
            Self::Unauthenticated => "unauthenticated",
            Self::Business { .. } => "business",
            Self::Decode(_) => "decode",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "unknown",
        }
    }
}

/// Serializable error shape delivered to UI call sites.
///
/// ```json
/// {
///   "kind": "client_error",
///   "message": "resource not found",
///   "status": 404,
///   "data": null,
///   "code": null
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedError {
    /// Classification tag (`network_timeout`, `client_error`, ...).
    pub kind: &'static str,
    /// Short message suitable for direct display.
    pub message: String,
    /// Original HTTP status, when one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Raw response body, when one was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Transport or envelope code, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Errors surfaced by the realtime event dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    /// A send or close was attempted with no live connection.
    #[error("no live realtime connection")]
    ConnectionAbsent,

    /// The WebSocket handshake failed.
    #[error("realtime handshake failed: {0}")]
    Handshake(String),

    /// The transport failed after the connection was established.
    #[error("realtime transport failure: {0}")]
    Transport(String),

    /// An outbound message could not be serialized.
    #[error("outbound message serialization failed: {0}")]
    Serialize(String),
}

/// Durable key/value store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage backend rejected the operation.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the privileged-process bridge capabilities.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The uploaded payload was not valid base64 or not a decodable image.
    #[error("invalid image payload: {0}")]
    InvalidImage(String),

    /// The declared mime type is not a supported image format.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// Durable store failure during a bridge operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Realtime dispatcher failure during a bridge operation.
    #[error(transparent)]
    Realtime(#[from] RealtimeError),
}
