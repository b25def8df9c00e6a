//! Category Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display order assigned to categories that have not been ranked yet.
pub const UNRANKED_DISPLAY_ORDER: i32 = 9999;

/// Catalog category
///
/// `default_margin` seeds the margin of every line item created from a
/// product of this category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Margin in percent (e.g., 20 = 20% markup on purchase price)
    pub default_margin: Decimal,
    pub display_order: i32,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub default_margin: Option<Decimal>,
    pub display_order: Option<i32>,
}
