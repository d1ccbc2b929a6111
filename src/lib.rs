//! # jaseats-client
//!
//! Client core for the JasEats food-ordering and recipe-recommendation
//! platform.
//!
//! This crate provides the two components every JasEats front-end shell
//! builds on: a token-aware HTTP API client with classified retry, and a
//! realtime event dispatcher that owns a single WebSocket connection and
//! fans inbound messages out to named channels. UI layers consume both
//! through plain async calls and channel subscriptions — they never touch
//! the transports directly.
//!
//! ## Architecture
//!
//! ```text
//! UI layers (desktop shell, mobile webview)
//!     │
//!     ├── ClientBridge (bridge/)
//!     │
//!     ├── ApiClient (api/)
//!     ├── RealtimeDispatcher (realtime/)
//!     │
//!     ├── SessionContext (session/)
//!     │
//!     └── KvStore — SQLite persistence (persistence/)
//! ```

pub mod api;
pub mod bridge;
pub mod config;
pub mod error;
pub mod persistence;
pub mod realtime;
pub mod session;
