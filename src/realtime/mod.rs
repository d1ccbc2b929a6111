//! Realtime layer: event classification, channel fan-out, and the
//! dispatcher that owns the single WebSocket connection.
//!
//! UI layers never touch the transport. They subscribe to named channels
//! (one per event category) and to the lifecycle stream, then drive the
//! connection through [`RealtimeDispatcher::connect`],
//! [`RealtimeDispatcher::send`], and [`RealtimeDispatcher::disconnect`].

pub mod channels;
pub mod dispatcher;
pub mod event;
pub mod state;

pub use channels::EventChannels;
pub use dispatcher::RealtimeDispatcher;
pub use event::{Channel, InboundEvent, RealtimeNotification};
pub use state::ConnectionState;
