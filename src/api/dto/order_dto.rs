//! Order shapes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Order entry as returned by the order endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Order identifier.
    pub id: String,
    /// Merchant the order was placed with.
    #[serde(default)]
    pub merchant_id: Option<i64>,
    /// Current order status tag.
    pub status: String,
    /// Order total in the platform currency.
    #[serde(default)]
    pub total: Option<f64>,
    /// Ordered items (free-form JSON).
    #[serde(default)]
    pub items: serde_json::Value,
    /// Order creation time.
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
}
