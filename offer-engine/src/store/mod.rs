//! Catalog and offer persistence
//!
//! The editor never touches storage directly; [`crate::service::OfferService`]
//! moves snapshots between the editor and a store implementing these traits.
//! Calls are synchronous and are run on the blocking pool by the service.

pub mod redb_store;

pub use redb_store::RedbStore;

use shared::error::{AppError, ErrorCode};
use shared::models::{BusinessCard, Category, OfferHeader, Product, SavedOffer, SavedOfferItem};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Offer not found: {0}")]
    OfferNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::OfferNotFound(id) => AppError::offer_not_found(id),
            StorageError::CategoryNotFound(id) => {
                AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id)
            }
            other => {
                tracing::error!(error = %other, "Storage error");
                AppError::database(other.to_string())
            }
        }
    }
}

/// Read access to the product catalog
pub trait CatalogStore: Send + Sync {
    /// All categories by display order, then name
    fn get_categories(&self) -> StorageResult<Vec<Category>>;

    fn get_category(&self, id: i64) -> StorageResult<Option<Category>>;

    fn get_product(&self, id: i64) -> StorageResult<Option<Product>>;

    /// Products of one category by name
    fn get_products_by_category(&self, category_id: i64) -> StorageResult<Vec<Product>>;

    fn get_business_card(&self) -> StorageResult<Option<BusinessCard>>;
}

/// Saved offers
pub trait OfferStore: Send + Sync {
    /// Insert or update the header and replace all items in one transaction
    ///
    /// Returns the offer id (newly assigned when `header.id` is `None`).
    fn save_offer(&self, header: &OfferHeader, items: &[SavedOfferItem]) -> StorageResult<i64>;

    /// Items in offer order
    fn load_offer_items(&self, offer_id: i64) -> StorageResult<Vec<SavedOfferItem>>;

    fn get_offer(&self, offer_id: i64) -> StorageResult<Option<SavedOffer>>;

    /// Newest first
    fn get_saved_offers(&self) -> StorageResult<Vec<SavedOffer>>;

    /// Returns `false` if the offer did not exist
    fn delete_offer(&self, offer_id: i64) -> StorageResult<bool>;
}
