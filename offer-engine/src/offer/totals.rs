//! Offer-level totals

use super::item::OfferLineItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sums over the line items of an offer
///
/// Always re-derived from the items; there is no running accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTotals {
    pub total_net: Decimal,
    pub total_vat: Decimal,
    pub total_gross: Decimal,
    pub item_count: usize,
}

impl OfferTotals {
    pub fn compute<'a>(items: impl IntoIterator<Item = &'a OfferLineItem>) -> Self {
        items
            .into_iter()
            .fold(Self::default(), |mut totals, item| {
                totals.total_net += item.total_net();
                totals.total_vat += item.vat_amount();
                totals.total_gross += item.total_gross();
                totals.item_count += 1;
                totals
            })
    }

    /// Item count line shown under the offer list
    pub fn items_info(&self) -> String {
        format!("Items in offer: {}", self.item_count)
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}
