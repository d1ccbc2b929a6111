//! Merchant and menu shapes.

use serde::Deserialize;

/// Merchant entry as returned by the list and detail endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantSummary {
    /// Merchant identifier (server formats these with an `M` prefix).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// `true` while the merchant is open for orders.
    #[serde(default)]
    pub status: bool,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Dish entry in a merchant menu.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDish {
    /// Dish identifier.
    pub id: String,
    /// Dish name.
    pub name: String,
    /// Price in the platform currency.
    #[serde(default)]
    pub price: Option<f64>,
    /// `true` while the dish is orderable.
    #[serde(default)]
    pub available: bool,
    /// Dish image URL.
    #[serde(default)]
    pub image: Option<String>,
}
