//! Money and percentage arithmetic on `rust_decimal`
//!
//! Every monetary output is rounded to 2 decimal places with
//! `MidpointAwayFromZero` (0.125 -> 0.13, -0.125 -> -0.13). Percentages are
//! plain numbers (23 = 23%), never fractions.

pub mod parse;

pub use parse::{
    format_currency, format_percent, format_price, parse_decimal, parse_percent, parse_price,
    parse_quantity, parse_vat_rate,
};

use rust_decimal::prelude::*;

/// Money precision
pub const DECIMAL_PLACES: u32 = 2;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Round a monetary or percentage value to 2dp, half away from zero
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// `amount × percent / 100`, unrounded
#[inline]
pub fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / HUNDRED
}

/// Sale price from purchase price and margin: `round(purchase × (1 + margin/100))`
pub fn apply_markup(purchase_price: Decimal, margin: Decimal) -> Decimal {
    round_money(purchase_price * (Decimal::ONE + margin / HUNDRED))
}

/// Margin implied by a sale price: `round((sale / purchase − 1) × 100)`
///
/// Returns `None` when the purchase price is not positive; the margin is
/// undefined there and callers keep their previous value.
pub fn markup_from_prices(purchase_price: Decimal, sale_price: Decimal) -> Option<Decimal> {
    if purchase_price <= Decimal::ZERO {
        return None;
    }
    Some(round_money((sale_price / purchase_price - Decimal::ONE) * HUNDRED))
}

/// Gross amount for a net amount at the given VAT rate
pub fn gross_from_net(net: Decimal, vat_rate: Decimal) -> Decimal {
    round_money(net + percent_of(net, vat_rate))
}
