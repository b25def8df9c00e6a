//! Offer Engine - pricing and ordering for sales offers
//!
//! # Overview
//!
//! An offer is an ordered list of line items priced from a purchase price
//! and a margin. The engine keeps margin and sale price reconciled, derives
//! totals with debounced recomputation, groups items by category for display
//! and export, and lets a reorder dialog rearrange items on a working copy.
//!
//! # Module layout
//!
//! ```text
//! offer-engine/src/
//! ├── core/          # configuration, environment setup
//! ├── money/         # decimal arithmetic, parsing, formatting
//! ├── offer/         # line items, totals, editor, recalc worker
//! ├── grouping/      # category groups and the version-keyed cache
//! ├── reorder/       # reorder session, export category order
//! ├── store/         # catalog/offer store traits, redb backend
//! ├── document/      # export document and text renderer
//! ├── service.rs     # async facade over editor + store
//! └── utils/         # logging
//! ```

pub mod core;
pub mod document;
pub mod grouping;
pub mod money;
pub mod offer;
pub mod reorder;
pub mod service;
pub mod store;
pub mod utils;

pub use core::{EngineConfig, setup_environment};
pub use document::{OfferDocument, OfferRenderer, RenderError, TextOfferRenderer};
pub use grouping::{CategoryGroup, GroupOrder, UNCATEGORIZED};
pub use offer::{
    FieldChanges, ItemDefaults, OfferEditor, OfferEvent, OfferLineItem, OfferTotals, RecalcWorker, SharedEditor,
};
pub use reorder::{CategoryOrderList, MoveDirection, ReorderSession, ViewMode};
pub use service::OfferService;
pub use store::{CatalogStore, OfferStore, RedbStore, StorageError};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::{init_logger, init_logger_with_file};
