//! Durable key/value persistence for session state.
//!
//! The client persists a handful of session entries (token, identifiers,
//! cached profile blobs) across restarts. [`KvStore`] is the seam: the
//! session context and the privileged-process bridge both take an
//! injected `Arc<dyn KvStore>` so storage can be swapped per platform
//! and faked in tests.

use std::fmt;

use async_trait::async_trait;

use crate::error::StoreError;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Well-known keys of the durable session entries.
pub mod keys {
    /// Bearer token issued at login.
    pub const TOKEN: &str = "token";
    /// Numeric user identifier.
    pub const USER_ID: &str = "user_id";
    /// Phone number used at login.
    pub const PHONE: &str = "phone";
    /// Merchant identifier, present only for merchant sessions.
    pub const MERCHANT_ID: &str = "merchant_id";
    /// Role the session is currently acting as.
    pub const CURRENT_ROLE: &str = "current_role";
    /// Cached user profile blob (JSON).
    pub const USER_PROFILE: &str = "user_profile";
    /// Cached merchant profile blob (JSON).
    pub const MERCHANT_PROFILE: &str = "merchant_profile";
}

/// Durable string key/value store.
///
/// Mirrors the four store operations the desktop shell exposes across its
/// process boundary: get, set, delete, clear.
#[async_trait]
pub trait KvStore: fmt::Debug + Send + Sync {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes the entry under `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on backend failure.
    async fn clear(&self) -> Result<(), StoreError>;
}
