//! Save-boundary validation
//!
//! Editing coerces bad input silently; persisting an offer does not. These
//! checks run right before rows are handed to the store.

use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{OfferHeader, SavedOfferItem};

/// Maximum offer title length (characters)
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum item name length (characters)
pub const MAX_NAME_LEN: usize = 500;
/// Maximum purchase price per unit
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 2);
/// Maximum quantity per line
const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

fn item_error(position: usize, field: &str, message: String) -> AppError {
    AppError::validation(message)
        .with_detail("position", position)
        .with_detail("field", field)
}

/// Validate a single stored row
pub fn validate_item(position: usize, item: &SavedOfferItem) -> AppResult<()> {
    if item.name.trim().is_empty() {
        return Err(item_error(position, "name", "item name must not be empty".into()));
    }
    if item.name.chars().count() > MAX_NAME_LEN {
        return Err(item_error(
            position,
            "name",
            format!("item name exceeds {MAX_NAME_LEN} characters"),
        ));
    }
    if item.purchase_price_net < Decimal::ZERO || item.purchase_price_net > MAX_PRICE {
        return Err(item_error(
            position,
            "purchase_price_net",
            format!(
                "purchase price must be between 0 and {MAX_PRICE}, got {}",
                item.purchase_price_net
            ),
        ));
    }
    if item.vat_rate < Decimal::ZERO || item.vat_rate > Decimal::ONE_HUNDRED {
        return Err(item_error(
            position,
            "vat_rate",
            format!("VAT rate must be between 0 and 100, got {}", item.vat_rate),
        ));
    }
    if item.quantity < Decimal::ZERO || item.quantity > MAX_QUANTITY {
        return Err(item_error(
            position,
            "quantity",
            format!(
                "quantity must be between 0 and {MAX_QUANTITY}, got {}",
                item.quantity
            ),
        ));
    }
    Ok(())
}

/// Validate an offer before saving
pub fn validate_offer(header: &OfferHeader, items: &[SavedOfferItem]) -> AppResult<()> {
    let title = header.title.trim();
    if title.is_empty() {
        return Err(AppError::new(ErrorCode::OfferTitleRequired));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::validation(format!(
            "offer title exceeds {MAX_TITLE_LEN} characters"
        ))
        .with_detail("field", "title"));
    }
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::OfferEmpty));
    }
    for (position, item) in items.iter().enumerate() {
        validate_item(position, item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> SavedOfferItem {
        SavedOfferItem {
            offer_id: 0,
            product_id: None,
            name: name.to_string(),
            custom_name: None,
            category_name: None,
            unit: "szt.".to_string(),
            purchase_price_net: Decimal::TEN,
            vat_rate: Decimal::from(23),
            margin: Decimal::from(20),
            quantity: Decimal::ONE,
        }
    }

    fn header(title: &str) -> OfferHeader {
        OfferHeader {
            id: None,
            title: title.to_string(),
            category_order: None,
        }
    }

    #[test]
    fn test_valid_offer() {
        assert!(validate_offer(&header("Kitchen refit"), &[row("Tile")]).is_ok());
    }

    #[test]
    fn test_title_required() {
        let err = validate_offer(&header("   "), &[row("Tile")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::OfferTitleRequired);
    }

    #[test]
    fn test_empty_offer_rejected() {
        let err = validate_offer(&header("Empty"), &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::OfferEmpty);
    }

    #[test]
    fn test_item_checks_report_position() {
        let mut bad = row("Grout");
        bad.vat_rate = Decimal::from(123);
        let err = validate_offer(&header("Bathroom"), &[row("Tile"), bad]).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details["position"], 1);
        assert_eq!(details["field"], "vat_rate");
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut bad = row("Tile");
        bad.quantity = Decimal::NEGATIVE_ONE;
        assert!(validate_item(0, &bad).is_err());

        let mut blank = row("  ");
        blank.quantity = Decimal::ONE;
        assert!(validate_item(0, &blank).is_err());
    }
}
