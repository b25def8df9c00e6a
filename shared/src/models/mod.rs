//! Data models
//!
//! Catalog entities (categories, products, business card) and the saved
//! offer rows. All IDs are `i64`.

pub mod business_card;
pub mod category;
pub mod offer;
pub mod product;

// Re-exports
pub use business_card::*;
pub use category::*;
pub use offer::*;
pub use product::*;
