//! Connection state machine of the realtime dispatcher.

/// Lifecycle state of the single owned connection.
///
/// Transitions:
/// `Disconnected → Connecting → Open → {Receiving, Closing} → Disconnected`,
/// plus an error transition from any non-`Disconnected` state straight
/// back to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection is owned.
    #[default]
    Disconnected,
    /// A handshake is in flight.
    Connecting,
    /// The connection is established and idle.
    Open,
    /// The connection is established and has delivered at least one frame.
    Receiving,
    /// A close was requested and is being performed.
    Closing,
}

impl ConnectionState {
    /// Returns `true` while outbound sends are permitted.
    #[must_use]
    pub const fn can_send(&self) -> bool {
        matches!(self, Self::Open | Self::Receiving)
    }

    /// Returns `true` for every state except `Disconnected`.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }

    /// Returns the state tag as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Receiving => "receiving",
            Self::Closing => "closing",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn only_open_states_can_send() {
        assert!(ConnectionState::Open.can_send());
        assert!(ConnectionState::Receiving.can_send());
        assert!(!ConnectionState::Disconnected.can_send());
        assert!(!ConnectionState::Connecting.can_send());
        assert!(!ConnectionState::Closing.can_send());
    }

    #[test]
    fn liveness_excludes_only_disconnected() {
        assert!(!ConnectionState::Disconnected.is_live());
        assert!(ConnectionState::Connecting.is_live());
        assert!(ConnectionState::Closing.is_live());
    }
}
