//! Text coercion and display formatting for prices and percentages
//!
//! Parsing never fails loudly: these functions back live text fields, so
//! bad input turns into a safe value instead of an error.

use rust_decimal::Decimal;

/// Non-breaking space used as the thousands separator
const GROUP_SEPARATOR: char = '\u{a0}';

fn normalize(text: &str) -> String {
    text.trim().replace(',', ".")
}

/// Parse a price field
///
/// Accepts `,` or `.` as the decimal separator and drops every character
/// that is not a digit or a dot (currency symbols, spaces, signs).
/// Unparsable input yields zero.
pub fn parse_price(text: &str) -> Decimal {
    let cleaned: String = normalize(text)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().unwrap_or(Decimal::ZERO)
}

/// Parse a signed decimal, tolerating `,` separators and a trailing `%`
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let normalized = normalize(text);
    let trimmed = normalized.trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse a percentage
///
/// A value strictly between 0 and 1 is read as a fraction (`0.23` -> `23`).
pub fn parse_percent(text: &str) -> Option<Decimal> {
    let value = parse_decimal(text)?;
    if value > Decimal::ZERO && value < Decimal::ONE {
        Some(value * Decimal::ONE_HUNDRED)
    } else {
        Some(value)
    }
}

/// Parse a VAT rate, falling back to `default` for blank or bad input
pub fn parse_vat_rate(text: &str, default: Decimal) -> Decimal {
    parse_percent(text).unwrap_or(default)
}

/// Parse a non-negative quantity
pub fn parse_quantity(text: &str) -> Option<Decimal> {
    parse_decimal(text).filter(|q| *q >= Decimal::ZERO)
}

/// Format a price as `1 234,56` (non-breaking space grouping, comma decimals)
pub fn format_price(value: Decimal) -> String {
    let rounded = super::round_money(value);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped},{frac_part}")
}

/// Format a price followed by the currency symbol
pub fn format_currency(value: Decimal, symbol: &str) -> String {
    format!("{} {}", format_price(value), symbol)
}

/// Format a percentage as `23.00%`
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", super::round_money(value))
}
