//! Bearer credential and typed identifiers.
//!
//! [`UserId`] and [`MerchantId`] are newtype wrappers around `i64`
//! providing type safety so the two identifier spaces cannot be confused.
//! A [`MerchantId`] is only valid when positive; anything else is treated
//! as absent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a `UserId` from a raw numeric identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner numeric value.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a merchant account.
///
/// Valid only when positive. Use [`MerchantId::from_raw`] when the source
/// value is untrusted (storage rehydration, login responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(i64);

impl MerchantId {
    /// Creates a `MerchantId` from a raw value, returning `None` unless
    /// the value is positive.
    #[must_use]
    pub const fn from_raw(id: i64) -> Option<Self> {
        if id > 0 { Some(Self(id)) } else { None }
    }

    /// Returns the inner numeric value.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role the session is currently acting as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary consumer account.
    #[default]
    User,
    /// Merchant account with a valid [`MerchantId`].
    Merchant,
}

impl Role {
    /// Returns the role tag as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Merchant => "merchant",
        }
    }

    /// Parses a stored role tag, defaulting to [`Role::User`] for
    /// unknown values.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "merchant" => Self::Merchant,
            _ => Self::User,
        }
    }
}

/// Session credential attached to outbound API requests.
///
/// Created on successful login, persisted to the durable store, and
/// attached as a bearer header to every request until explicitly cleared.
/// There is no refresh flow: token presence alone determines the
/// authenticated state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    /// Opaque bearer token issued at login.
    pub token: String,
    /// Numeric user identifier.
    pub user_id: UserId,
    /// Merchant identifier, present only for merchant sessions.
    pub merchant_id: Option<MerchantId>,
    /// Role the session acts as.
    pub role: Role,
}

impl SessionCredential {
    /// Creates a consumer credential.
    #[must_use]
    pub fn new(token: impl Into<String>, user_id: UserId) -> Self {
        Self {
            token: token.into(),
            user_id,
            merchant_id: None,
            role: Role::User,
        }
    }

    /// Creates a merchant credential.
    #[must_use]
    pub fn for_merchant(
        token: impl Into<String>,
        user_id: UserId,
        merchant_id: MerchantId,
    ) -> Self {
        Self {
            token: token.into(),
            user_id,
            merchant_id: Some(merchant_id),
            role: Role::Merchant,
        }
    }

    /// Returns `true` when the credential carries a non-empty token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}
