//! Async facade over the editor and a store
//!
//! Store calls are synchronous (redb) and run on the blocking pool; the
//! editor lock is only held for in-memory work, never across an await.

use crate::document::{OfferDocument, OfferRenderer, TextOfferRenderer};
use crate::offer::SharedEditor;
use crate::reorder::{ApplyOutcome, ReorderSession};
use crate::store::{CatalogStore, OfferStore, StorageResult};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{BusinessCard, Category, Product, SavedOffer};
use std::path::Path;
use std::sync::Arc;

pub struct OfferService<S> {
    store: Arc<S>,
    editor: SharedEditor,
    renderer: Arc<dyn OfferRenderer>,
}

impl<S> Clone for OfferService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            editor: Arc::clone(&self.editor),
            renderer: Arc::clone(&self.renderer),
        }
    }
}

impl<S> OfferService<S>
where
    S: CatalogStore + OfferStore + 'static,
{
    pub fn new(store: Arc<S>, editor: SharedEditor) -> Self {
        Self {
            store,
            editor,
            renderer: Arc::new(TextOfferRenderer::default()),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn OfferRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn editor(&self) -> &SharedEditor {
        &self.editor
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Run a store call on the blocking pool
    async fn blocking<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> StorageResult<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| {
                tracing::error!("spawn_blocking join error: {e}");
                AppError::new(ErrorCode::TaskFailed)
            })?;
        Ok(result?)
    }

    // ========== Catalog ==========

    /// All categories; also makes their display order the grouping order
    pub async fn load_categories(&self) -> AppResult<Vec<Category>> {
        let categories = self.blocking(|s| s.get_categories()).await?;
        self.editor.lock().set_category_order(&categories);
        Ok(categories)
    }

    pub async fn products_for_category(&self, category_id: i64) -> AppResult<Vec<Product>> {
        self.blocking(move |s| s.get_products_by_category(category_id))
            .await
    }

    /// Products of a category not yet in the offer, filtered by name or code
    pub async fn available_products(&self, category_id: i64, query: &str) -> AppResult<Vec<Product>> {
        let products = self.products_for_category(category_id).await?;
        let editor = self.editor.lock();
        Ok(editor
            .available_products(&products, query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Add every product of a category in one batch; returns how many were new
    pub async fn add_category_products(&self, category_id: i64) -> AppResult<usize> {
        let (category, products) = self
            .blocking(move |s| {
                let category = s.get_category(category_id)?;
                let products = s.get_products_by_category(category_id)?;
                Ok((category, products))
            })
            .await?;
        let category = category.ok_or_else(|| {
            AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", category_id)
        })?;

        let added = self.editor.lock().add_products(&products, Some(&category));
        tracing::info!(
            category_id,
            added,
            skipped = products.len() - added,
            "Category products added to offer"
        );
        Ok(added)
    }

    /// Add one catalog product with its category's default margin
    ///
    /// Returns the new item's instance id.
    pub async fn add_product(&self, product_id: i64) -> AppResult<String> {
        let (product, category) = self
            .blocking(move |s| {
                let Some(product) = s.get_product(product_id)? else {
                    return Ok((None, None));
                };
                let category = s.get_category(product.category_id)?;
                Ok((Some(product), category))
            })
            .await?;
        let product = product.ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", product_id)
        })?;

        self.editor
            .lock()
            .add_product(&product, category.as_ref())
            .ok_or_else(|| {
                AppError::new(ErrorCode::OfferItemDuplicate).with_detail("product_id", product_id)
            })
    }

    pub fn remove_item(&self, instance_id: &str) -> AppResult<()> {
        match self.editor.lock().remove_item(instance_id) {
            Some(_) => Ok(()),
            None => Err(AppError::new(ErrorCode::OfferItemNotFound)
                .with_detail("instance_id", instance_id)),
        }
    }

    // ========== Reorder ==========

    /// Working copy of the current order
    pub fn begin_reorder(&self) -> AppResult<ReorderSession> {
        let session = self.editor.lock().begin_reorder();
        if session.is_empty() {
            return Err(AppError::new(ErrorCode::ReorderSessionEmpty));
        }
        Ok(session)
    }

    pub fn apply_reorder(&self, session: ReorderSession) -> AppResult<ApplyOutcome> {
        match session.apply(&mut self.editor.lock()) {
            ApplyOutcome::Empty => Err(AppError::new(ErrorCode::ReorderSessionEmpty)),
            outcome => Ok(outcome),
        }
    }

    // ========== Offers ==========

    /// Validate and persist the current offer; returns its id
    pub async fn save_offer(&self, title: &str) -> AppResult<i64> {
        let (header, rows) = self.editor.lock().snapshot_for_save(title)?;
        let title = header.title.clone();

        let offer_id = self
            .blocking(move |s| s.save_offer(&header, &rows))
            .await?;

        self.editor.lock().mark_saved(offer_id, &title);
        Ok(offer_id)
    }

    /// Persist the current offer under a new id
    pub async fn save_offer_as_new(&self, title: &str) -> AppResult<i64> {
        self.editor.lock().detach_saved();
        self.save_offer(title).await
    }

    async fn fetch_offer(
        &self,
        offer_id: i64,
    ) -> AppResult<(SavedOffer, Vec<shared::models::SavedOfferItem>)> {
        let (offer, rows) = self
            .blocking(move |s| {
                let offer = s.get_offer(offer_id)?;
                let rows = s.load_offer_items(offer_id)?;
                Ok((offer, rows))
            })
            .await?;
        let offer = offer.ok_or_else(|| AppError::offer_not_found(offer_id))?;
        Ok((offer, rows))
    }

    /// Replace the editor contents with a saved offer
    pub async fn open_offer(&self, offer_id: i64) -> AppResult<SavedOffer> {
        let (offer, rows) = self.fetch_offer(offer_id).await?;
        self.editor.lock().load_offer(&offer, &rows);
        Ok(offer)
    }

    /// Start a new offer with a saved offer's items
    pub async fn open_as_template(&self, offer_id: i64) -> AppResult<SavedOffer> {
        let (offer, rows) = self.fetch_offer(offer_id).await?;
        self.editor.lock().load_as_template(&offer, &rows);
        Ok(offer)
    }

    /// Saved offers, newest first
    pub async fn list_offers(&self) -> AppResult<Vec<SavedOffer>> {
        self.blocking(|s| s.get_saved_offers()).await
    }

    pub async fn delete_offer(&self, offer_id: i64) -> AppResult<()> {
        let existed = self.blocking(move |s| s.delete_offer(offer_id)).await?;
        if !existed {
            return Err(AppError::offer_not_found(offer_id));
        }

        let mut editor = self.editor.lock();
        if editor.header().id == Some(offer_id) {
            editor.detach_saved();
        }
        Ok(())
    }

    // ========== Export ==========

    /// Stored seller card; a missing or blank card is an error
    pub async fn business_card(&self) -> AppResult<BusinessCard> {
        self.blocking(|s| s.get_business_card())
            .await?
            .filter(|card| !card.is_empty())
            .ok_or_else(|| AppError::new(ErrorCode::BusinessCardMissing))
    }

    /// Document for the current offer, laid out in its export category order
    pub async fn build_document(&self) -> AppResult<OfferDocument> {
        let card = self.blocking(|s| s.get_business_card()).await?;

        let editor = self.editor.lock();
        let header = editor.header();
        Ok(
            OfferDocument::build(editor.items(), card, header.category_order.as_deref())
                .with_title(header.title.clone()),
        )
    }

    /// Rendered bytes of the current offer
    pub async fn export_document(&self) -> AppResult<Vec<u8>> {
        let document = self.build_document().await?;
        if document.is_empty() {
            return Err(AppError::new(ErrorCode::OfferEmpty));
        }
        let bytes = self.renderer.render(&document)?;
        tracing::info!(
            items = document.line_count(),
            bytes = bytes.len(),
            "Offer exported"
        );
        Ok(bytes)
    }

    /// Render and write the current offer to `path`
    pub async fn export_to(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let bytes = self.export_document().await?;
        let path = path.as_ref();
        tokio::fs::write(path, bytes).await.map_err(|e| {
            tracing::error!(path = %path.display(), "Failed to write offer document: {e}");
            AppError::render(format!("failed to write {}: {e}", path.display()))
        })
    }

    pub fn renderer_extension(&self) -> &'static str {
        self.renderer.extension()
    }
}
