//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default unit label for products imported without one
pub const DEFAULT_UNIT: &str = "szt.";

/// VAT rate (percent) for products created without one
pub const DEFAULT_VAT_RATE: Decimal = Decimal::from_parts(23, 0, 0, false, 0);

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    /// Supplier or catalog code, searchable alongside the name
    pub code: Option<String>,
    pub name: String,
    pub unit: String,
    pub purchase_price_net: Decimal,
    /// When the purchase price was last updated (Unix millis)
    pub price_updated_at: Option<i64>,
    /// VAT rate in percentage (e.g., 23 = 23%)
    pub vat_rate: Decimal,
    pub category_id: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub code: Option<String>,
    pub name: String,
    pub unit: Option<String>,
    pub purchase_price_net: Decimal,
    pub vat_rate: Option<Decimal>,
    pub category_id: i64,
}
