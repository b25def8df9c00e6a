//! Offer document export
//!
//! [`OfferDocument`] is a read-only snapshot of an offer laid out for
//! export: grouped by category in the requested order, with per-line derived
//! values and the offer totals. Renderers only consume this snapshot.

mod text;

pub use text::{MIN_DOCUMENT_WIDTH, TextOfferRenderer};

use crate::grouping::{CategoryOrder, GroupOrder, group_items};
use crate::offer::{OfferLineItem, OfferTotals};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::BusinessCard;
use std::collections::HashMap;
use thiserror::Error;

/// Renderer errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Document has no items")]
    EmptyDocument,

    #[error("Document width {width} is below the minimum of {min}")]
    WidthTooSmall { width: usize, min: usize },

    #[error("Page must hold at least {min} lines, got {lines}")]
    PageTooShort { lines: usize, min: usize },
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::render(e.to_string())
    }
}

/// One printed line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLine {
    /// 1-based, running across sections
    pub position: usize,
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub sale_price_net: Decimal,
    pub vat_rate: Decimal,
    pub sale_price_gross: Decimal,
    pub total_net: Decimal,
    pub total_gross: Decimal,
}

impl DocumentLine {
    fn from_item(position: usize, item: &OfferLineItem) -> Self {
        Self {
            position,
            name: item.display_name().to_string(),
            quantity: item.quantity(),
            unit: item.unit().to_string(),
            sale_price_net: item.sale_price_net(),
            vat_rate: item.vat_rate(),
            sale_price_gross: item.sale_price_gross(),
            total_net: item.total_net(),
            total_gross: item.total_gross(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub category: String,
    pub lines: Vec<DocumentLine>,
    pub total_net: Decimal,
    pub total_gross: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDocument {
    pub title: String,
    pub issued_on: NaiveDate,
    /// Omitted when the stored card is blank
    pub business_card: Option<BusinessCard>,
    pub sections: Vec<DocumentSection>,
    pub totals: OfferTotals,
}

impl OfferDocument {
    /// Lay out the items by category
    ///
    /// With a non-empty `category_order` sections follow it (unknown
    /// categories last); otherwise sections are alphabetical.
    pub fn build(
        items: &[OfferLineItem],
        business_card: Option<BusinessCard>,
        category_order: Option<&[String]>,
    ) -> Self {
        let order = match category_order {
            Some(names) if !names.is_empty() => {
                GroupOrder::DisplayOrder(CategoryOrder::from_names(names))
            }
            _ => GroupOrder::Alphabetical,
        };
        let by_id: HashMap<&str, &OfferLineItem> =
            items.iter().map(|i| (i.instance_id(), i)).collect();

        let mut position = 0;
        let sections = group_items(items, &order, &HashMap::new())
            .into_iter()
            .map(|group| {
                let lines: Vec<DocumentLine> = group
                    .item_ids
                    .iter()
                    .filter_map(|id| by_id.get(id.as_str()))
                    .map(|item| {
                        position += 1;
                        DocumentLine::from_item(position, item)
                    })
                    .collect();
                DocumentSection {
                    total_net: lines.iter().map(|l| l.total_net).sum(),
                    total_gross: lines.iter().map(|l| l.total_gross).sum(),
                    category: group.label,
                    lines,
                }
            })
            .collect();

        Self {
            title: String::new(),
            issued_on: chrono::Local::now().date_naive(),
            business_card: business_card.filter(|card| !card.is_empty()),
            sections,
            totals: OfferTotals::compute(items),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_date(mut self, issued_on: NaiveDate) -> Self {
        self.issued_on = issued_on;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.sections.iter().map(|s| s.lines.len()).sum()
    }
}

/// Turns an [`OfferDocument`] into bytes for a file or printer
pub trait OfferRenderer: Send + Sync {
    /// File extension of the output, without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, document: &OfferDocument) -> Result<Vec<u8>, RenderError>;
}

#[cfg(test)]
mod tests;
