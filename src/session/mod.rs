//! Session layer: credential model and shared session context.
//!
//! This module contains the client-side identity model: typed user and
//! merchant identifiers, the bearer credential, and the session context
//! object that owns the in-memory credential with durable persistence as
//! an injected hook.

pub mod context;
pub mod credential;

pub use context::SessionContext;
pub use credential::{MerchantId, Role, SessionCredential, UserId};
