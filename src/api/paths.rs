//! Versioned endpoint paths of the remote API.
//!
//! Constants for fixed paths, functions where a path embeds an
//! identifier. All paths are relative to the configured base URL.

use crate::session::{MerchantId, UserId};

/// Login endpoint.
pub const LOGIN: &str = "/v1/users/login";
/// Registration endpoint.
pub const REGISTER: &str = "/v1/users/register";
/// SMS verification code endpoint.
pub const SEND_SMS_CODE: &str = "/v1/users/send-sms-code";

/// Merchant list endpoint.
pub const MERCHANT_LIST: &str = "/v1/merchant";

/// Today's recipes endpoint.
pub const RECIPE_TODAY: &str = "/v1/recipe/today";
/// Recommended recipes endpoint.
pub const RECIPE_RECOMMEND: &str = "/v1/recipe/recommend";
/// Favorite recipes endpoint.
pub const RECIPE_FAVORITE: &str = "/v1/recipe/favorite";

/// Message records endpoint.
pub const MESSAGE_RECORDS: &str = "/v1/message/records";
/// Message send endpoint.
pub const MESSAGE_SEND: &str = "/v1/message/send";

/// Profile of a single user.
#[must_use]
pub fn user_profile(user_id: UserId) -> String {
    format!("/v1/users/{user_id}")
}

/// Preferences of a single user.
#[must_use]
pub fn user_preferences(user_id: UserId) -> String {
    format!("/v1/users/{user_id}/preferences")
}

/// Detail of a single merchant.
#[must_use]
pub fn merchant_detail(merchant_id: MerchantId) -> String {
    format!("/v1/merchant/{merchant_id}")
}

/// Menu of a single merchant.
#[must_use]
pub fn merchant_menu(merchant_id: MerchantId) -> String {
    format!("/v1/menus/merchants/{merchant_id}/menu")
}

/// Orders of a single user.
#[must_use]
pub fn user_orders(user_id: UserId) -> String {
    format!("/v1/orders/user/{user_id}")
}

/// Detail of a single order. Order identifiers are server-prefixed
/// strings, not bare numbers.
#[must_use]
pub fn order_detail(order_id: &str) -> String {
    format!("/v1/orders/{order_id}")
}

/// Collection list of a single user; DELETE on the same path clears it.
#[must_use]
pub fn user_collections(user_id: UserId) -> String {
    format!("/v1/collections/user/{user_id}")
}

/// A single collection entry.
#[must_use]
pub fn collection(collection_id: i64) -> String {
    format!("/v1/collections/{collection_id}")
}
