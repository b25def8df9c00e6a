//! Change notifications published by the offer editor

use super::item::FieldChanges;
use super::totals::OfferTotals;
use serde::{Deserialize, Serialize};

/// Offer editor event
///
/// Sent on a `tokio::sync::broadcast` channel. Subscribers that lag simply
/// miss intermediate events; the editor state is always readable directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfferEvent {
    /// A single item's values changed
    ItemChanged {
        instance_id: String,
        fields: FieldChanges,
    },
    /// Items were added, removed, replaced or reordered
    StructureChanged { version: u64, item_count: usize },
    /// Published totals were recomputed
    TotalsChanged(OfferTotals),
    /// The offer was saved under the given id
    Saved { offer_id: i64 },
}
