//! Inbound event classification: tags, channels, and notifications.
//!
//! Every inbound frame carries a declared type tag. The tag maps through
//! a fixed table onto one of the named channels; unknown tags land on the
//! generic message channel, and frames that fail structured parse surface
//! as a distinct parse-failure notification rather than being dropped.

use serde::Serialize;

/// Named local channel an inbound event is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Authentication handshake responses.
    Auth,
    /// Order lifecycle updates.
    Order,
    /// Chat traffic (private, group, system).
    Chat,
    /// Merchant and menu updates.
    Merchant,
    /// Recipe recommendations pushed by the server.
    Recommendation,
    /// User-facing notifications.
    Notification,
    /// Generic channel for structurally valid frames with an unmapped tag.
    Message,
}

impl Channel {
    /// Every named channel, in delivery-table order.
    pub const ALL: [Self; 7] = [
        Self::Auth,
        Self::Order,
        Self::Chat,
        Self::Merchant,
        Self::Recommendation,
        Self::Notification,
        Self::Message,
    ];

    /// Maps a declared type tag onto its channel.
    ///
    /// The table is closed: anything not listed lands on [`Channel::Message`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "auth" | "authResponse" => Self::Auth,
            "orderUpdate" | "orderStatusChange" => Self::Order,
            "chat" | "privateChat" | "groupChat" | "systemMessage" => Self::Chat,
            "merchantUpdate" | "menuUpdate" => Self::Merchant,
            "recommend" => Self::Recommendation,
            "notification" | "systemNotification" => Self::Notification,
            _ => Self::Message,
        }
    }

    /// Returns the channel name as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Order => "order",
            Self::Chat => "chat",
            Self::Merchant => "merchant",
            Self::Recommendation => "recommendation",
            Self::Notification => "notification",
            Self::Message => "message",
        }
    }
}

/// A successfully parsed inbound frame.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Declared type tag. The canonical discriminant field is `type`;
    /// `msgType` is accepted as a legacy alias emitted by the chat relay.
    /// Frames with neither field carry an empty tag.
    pub tag: String,
    /// Channel the tag maps to.
    pub channel: Channel,
    /// Full frame payload, including the tag field.
    pub payload: serde_json::Value,
}

impl InboundEvent {
    /// Parses a text frame and classifies it.
    ///
    /// # Errors
    ///
    /// Returns the serde diagnostic when the frame is not valid JSON.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let payload: serde_json::Value = serde_json::from_str(text)?;
        let tag = payload
            .get("type")
            .or_else(|| payload.get("msgType"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let channel = Channel::from_tag(&tag);
        Ok(Self {
            tag,
            channel,
            payload,
        })
    }
}

/// Lifecycle and error notifications emitted alongside the typed channels.
#[derive(Debug, Clone)]
pub enum RealtimeNotification {
    /// The connection completed its handshake.
    Opened,
    /// The connection closed, with the close code and reason when known.
    Closed {
        /// Close code reported by the transport.
        code: Option<u16>,
        /// Close reason reported by the transport.
        reason: Option<String>,
    },
    /// The transport failed after the handshake.
    TransportError {
        /// Transport diagnostic.
        message: String,
    },
    /// An inbound frame failed structured parse. Never silently dropped.
    ParseFailure {
        /// The raw frame as received.
        raw: String,
        /// Parse diagnostic.
        error: String,
    },
}
