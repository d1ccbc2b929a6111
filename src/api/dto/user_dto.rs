//! User profile shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile as returned by the profile endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Numeric user identifier.
    pub user_id: i64,
    /// Registered phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Display nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Height in centimeters.
    #[serde(default)]
    pub height: Option<f64>,
    /// Weight in kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Dietary goal tag.
    #[serde(default)]
    pub diet_goal: Option<String>,
    /// Allergy list (free-form JSON).
    #[serde(default)]
    pub allergies: serde_json::Value,
    /// Preferred cuisine/ingredient tags (free-form JSON).
    #[serde(default)]
    pub prefer_tags: serde_json::Value,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Account creation time.
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
}

/// Partial user update; only present fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// New nickname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// New height in centimeters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New weight in kilograms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// New dietary goal tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_goal: Option<String>,
    /// New contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
