//! Offer editing: line items, totals, change events and the live editor

pub mod editor;
pub mod events;
pub mod item;
pub mod totals;
pub mod validation;
pub mod worker;

pub use editor::{OfferEditor, SUMMARY_DEBOUNCE_MS};
pub use events::OfferEvent;
pub use item::{FieldChanges, ItemDefaults, ItemField, OfferLineItem};
pub use totals::OfferTotals;
pub use validation::{validate_item, validate_offer};
pub use worker::{RecalcWorker, SharedEditor};
