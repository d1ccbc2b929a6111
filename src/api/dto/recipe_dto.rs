//! Recipe shapes.

use serde::Deserialize;

/// Recipe entry as returned by the recipe endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Recipe identifier.
    pub id: String,
    /// Recipe title.
    pub name: String,
    /// Cover image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Estimated calories per serving.
    #[serde(default)]
    pub calories: Option<f64>,
    /// Ingredient list (free-form JSON).
    #[serde(default)]
    pub ingredients: serde_json::Value,
    /// Meal slot tag (breakfast/lunch/dinner).
    #[serde(default)]
    pub meal_type: Option<String>,
}
