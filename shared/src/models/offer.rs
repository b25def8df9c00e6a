//! Saved Offer Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted offer header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedOffer {
    pub id: i64,
    pub title: String,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub modified_at: i64,
    /// Custom category order used when exporting, by category name
    #[serde(default)]
    pub category_order: Option<Vec<String>>,
}

/// Save payload for an offer header
///
/// `id: None` creates a new offer, `Some(id)` replaces an existing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferHeader {
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub category_order: Option<Vec<String>>,
}

/// Persisted line item snapshot
///
/// Items are stored in offer order; position is implied by the sequence
/// returned from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedOfferItem {
    pub offer_id: i64,
    /// Source catalog product (None when the product was deleted)
    pub product_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub custom_name: Option<String>,
    pub category_name: Option<String>,
    pub unit: String,
    pub purchase_price_net: Decimal,
    pub vat_rate: Decimal,
    pub margin: Decimal,
    pub quantity: Decimal,
}
