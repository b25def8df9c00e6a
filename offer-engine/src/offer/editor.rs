//! Live offer editor
//!
//! Owns the ordered line items of the offer being edited and keeps the
//! derived views in step with them:
//!
//! - **Totals**: structural changes (add, remove, load, reorder) recompute
//!   immediately. Value edits (margin, price, quantity, VAT) only move a
//!   single recompute deadline forward by the debounce window; the last
//!   edit wins and nothing is queued. Between the edit and the deadline the
//!   published totals are allowed to be stale.
//! - **Grouping**: cached against `version`, which only structural changes
//!   (and category renames) bump.
//! - **Batches**: [`OfferEditor::batch`] suppresses per-item events and
//!   performs one structural bump and one recompute when the outermost
//!   batch closes.
//!
//! The deadline is driven either by the owner polling
//! [`OfferEditor::poll_recalc`] or by a [`super::RecalcWorker`].

use super::events::OfferEvent;
use super::item::{FieldChanges, ItemDefaults, OfferLineItem};
use super::totals::OfferTotals;
use super::validation::validate_offer;
use crate::core::EngineConfig;
use crate::grouping::{CategoryGroup, CategoryOrder, GroupOrder, GroupingCache, category_label};
use crate::reorder::ReorderSession;
use rust_decimal::Decimal;
use shared::error::AppResult;
use shared::models::{Category, OfferHeader, Product, SavedOffer, SavedOfferItem};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast};
use tokio::time::Instant;

/// Default debounce window for totals recomputation
pub const SUMMARY_DEBOUNCE_MS: u64 = 300;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct OfferEditor {
    items: Vec<OfferLineItem>,
    /// Structural version, bumped on membership/order changes only
    version: u64,
    /// Last published totals
    totals: OfferTotals,
    recalc_deadline: Option<Instant>,
    debounce: Duration,
    batch_depth: u32,
    batch_structural: bool,
    batch_values: bool,
    grouping: GroupingCache,
    group_order: GroupOrder,
    header: OfferHeader,
    defaults: ItemDefaults,
    events: broadcast::Sender<OfferEvent>,
    wake: Arc<Notify>,
}

impl OfferEditor {
    pub fn new(debounce: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            items: Vec::new(),
            version: 0,
            totals: OfferTotals::default(),
            recalc_deadline: None,
            debounce,
            batch_depth: 0,
            batch_structural: false,
            batch_values: false,
            grouping: GroupingCache::new(),
            group_order: GroupOrder::default(),
            header: OfferHeader::default(),
            defaults: ItemDefaults::default(),
            events,
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.summary_debounce()).with_defaults(ItemDefaults {
            vat_rate: config.default_vat_rate,
            unit: config.default_unit.clone(),
        })
    }

    pub fn with_defaults(mut self, defaults: ItemDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &ItemDefaults {
        &self.defaults
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OfferEvent> {
        self.events.subscribe()
    }

    /// Notified whenever the recompute deadline moves
    pub fn wake_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.wake)
    }

    // ========== Read access ==========

    pub fn items(&self) -> &[OfferLineItem] {
        &self.items
    }

    pub fn item(&self, instance_id: &str) -> Option<&OfferLineItem> {
        self.items.iter().find(|i| i.instance_id() == instance_id)
    }

    pub fn position(&self, instance_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.instance_id() == instance_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn header(&self) -> &OfferHeader {
        &self.header
    }

    pub fn contains_product(&self, product_id: i64) -> bool {
        self.items.iter().any(|i| i.product_id() == Some(product_id))
    }

    /// Published totals; may lag behind value edits by the debounce window
    pub fn totals(&self) -> OfferTotals {
        self.totals
    }

    /// Totals computed from the current items, ignoring the debounce
    pub fn current_totals(&self) -> OfferTotals {
        OfferTotals::compute(&self.items)
    }

    pub fn items_info(&self) -> String {
        self.totals.items_info()
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_selected()).count()
    }

    // ========== Notifications ==========

    fn emit(&self, event: OfferEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    fn structure_changed(&mut self) {
        if self.batch_depth > 0 {
            self.batch_structural = true;
            return;
        }
        self.bump_version();
        self.recompute_now();
    }

    fn bump_version(&mut self) {
        self.version += 1;
        self.emit(OfferEvent::StructureChanged {
            version: self.version,
            item_count: self.items.len(),
        });
    }

    fn values_changed(&mut self, instance_id: String, changes: FieldChanges) {
        if changes.is_empty() {
            return;
        }
        if self.batch_depth > 0 {
            self.batch_values |= changes.affects_totals();
            self.batch_structural |= changes.affects_grouping();
            return;
        }

        let affects_totals = changes.affects_totals();
        let affects_grouping = changes.affects_grouping();
        self.emit(OfferEvent::ItemChanged {
            instance_id,
            fields: changes,
        });
        if affects_grouping {
            self.bump_version();
        }
        if affects_totals {
            self.schedule_recalc();
        }
    }

    // ========== Totals ==========

    fn schedule_recalc(&mut self) {
        self.recalc_deadline = Some(Instant::now() + self.debounce);
        self.wake.notify_one();
    }

    fn recompute_now(&mut self) {
        self.recalc_deadline = None;
        let totals = OfferTotals::compute(&self.items);
        if totals != self.totals {
            tracing::debug!(
                net = %totals.total_net,
                gross = %totals.total_gross,
                items = totals.item_count,
                "Offer totals recomputed"
            );
            self.totals = totals;
            self.emit(OfferEvent::TotalsChanged(totals));
        }
    }

    pub fn next_recalc_deadline(&self) -> Option<Instant> {
        self.recalc_deadline
    }

    pub fn is_recalc_pending(&self) -> bool {
        self.recalc_deadline.is_some()
    }

    /// Recompute if the debounce deadline has passed
    pub fn poll_recalc(&mut self) -> bool {
        self.poll_recalc_at(Instant::now())
    }

    pub fn poll_recalc_at(&mut self, now: Instant) -> bool {
        match self.recalc_deadline {
            Some(deadline) if deadline <= now => {
                self.recompute_now();
                true
            }
            _ => false,
        }
    }

    /// Recompute a pending deadline right away
    pub fn flush_recalc(&mut self) {
        if self.recalc_deadline.is_some() {
            self.recompute_now();
        }
    }

    /// Wait out pending deadlines until the totals are settled
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.recalc_deadline {
            tokio::time::sleep_until(deadline).await;
            self.poll_recalc();
        }
    }

    // ========== Batch ==========

    /// Run several mutations as one logical change
    ///
    /// Nested batches fold into the outermost one.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.finish_batch();
        }
        result
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    fn finish_batch(&mut self) {
        let structural = std::mem::take(&mut self.batch_structural);
        let values = std::mem::take(&mut self.batch_values);
        if structural {
            self.bump_version();
        }
        if structural || values {
            self.recompute_now();
        }
    }

    // ========== Item operations ==========

    /// Append an item, returning its instance id
    pub fn add_item(&mut self, item: OfferLineItem) -> String {
        let id = item.instance_id().to_string();
        tracing::debug!(instance_id = %id, name = item.display_name(), "Item added to offer");
        self.items.push(item);
        self.structure_changed();
        id
    }

    /// Add a catalog product with its category's default margin
    ///
    /// Returns `None` when the product is already in the offer.
    pub fn add_product(&mut self, product: &Product, category: Option<&Category>) -> Option<String> {
        if self.contains_product(product.id) {
            tracing::warn!(product_id = product.id, "Product already in offer, skipped");
            return None;
        }
        let item = OfferLineItem::from_product(product, category, &self.defaults);
        Some(self.add_item(item))
    }

    /// Add every product not yet in the offer, as one batch
    pub fn add_products(&mut self, products: &[Product], category: Option<&Category>) -> usize {
        self.batch(|editor| {
            products
                .iter()
                .filter_map(|p| editor.add_product(p, category))
                .count()
        })
    }

    pub fn remove_item(&mut self, instance_id: &str) -> Option<OfferLineItem> {
        let index = self.position(instance_id)?;
        let item = self.items.remove(index);
        self.structure_changed();
        Some(item)
    }

    /// Remove all selected items, as one batch
    pub fn remove_selected(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|i| !i.is_selected());
        let removed = before - self.items.len();
        if removed > 0 {
            self.structure_changed();
        }
        removed
    }

    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.items.clear();
        self.structure_changed();
    }

    /// Mutate one item through its setters
    ///
    /// Returns `None` for an unknown id.
    pub fn update_item(
        &mut self,
        instance_id: &str,
        f: impl FnOnce(&mut OfferLineItem) -> FieldChanges,
    ) -> Option<FieldChanges> {
        let index = self.position(instance_id)?;
        let changes = f(&mut self.items[index]);
        self.values_changed(instance_id.to_string(), changes.clone());
        Some(changes)
    }

    pub fn set_margin(&mut self, instance_id: &str, margin: Decimal) -> Option<FieldChanges> {
        self.update_item(instance_id, |item| item.set_margin(margin))
    }

    pub fn set_sale_price_net(&mut self, instance_id: &str, price: Decimal) -> Option<FieldChanges> {
        self.update_item(instance_id, |item| item.set_sale_price_net(price))
    }

    pub fn set_quantity(&mut self, instance_id: &str, quantity: Decimal) -> Option<FieldChanges> {
        self.update_item(instance_id, |item| item.set_quantity(quantity))
    }

    /// Entered VAT text; unparsable input falls back to the configured rate
    pub fn set_vat_rate_text(&mut self, instance_id: &str, text: &str) -> Option<FieldChanges> {
        let fallback = self.defaults.vat_rate;
        self.update_item(instance_id, |item| item.set_vat_rate_text(text, fallback))
    }

    pub fn set_selected(&mut self, instance_id: &str, selected: bool) -> Option<FieldChanges> {
        self.update_item(instance_id, |item| item.set_selected(selected))
    }

    // ========== Bulk operations ==========

    fn set_selection_where(&mut self, selected: bool, pred: impl Fn(&OfferLineItem) -> bool) {
        self.batch(|editor| {
            let ids: Vec<String> = editor
                .items
                .iter()
                .filter(|&i| pred(i))
                .map(|i| i.instance_id().to_string())
                .collect();
            for id in ids {
                editor.set_selected(&id, selected);
            }
        });
    }

    pub fn select_all(&mut self) {
        self.set_selection_where(true, |_| true);
    }

    pub fn deselect_all(&mut self) {
        self.set_selection_where(false, |_| true);
    }

    /// Select every item of a category, or deselect them if all already are
    ///
    /// Returns the new selection state of the category.
    pub fn toggle_category_selection(&mut self, label: &str) -> bool {
        let members = || {
            self.items
                .iter()
                .filter(|i| category_label(i.category_name()) == label)
        };
        let select = !members().all(|i| i.is_selected());
        self.set_selection_where(select, |i| category_label(i.category_name()) == label);
        select
    }

    /// Apply one margin to every selected item and clear the selection
    pub fn apply_margin_to_selected(&mut self, margin: Decimal) -> usize {
        let count = self.batch(|editor| {
            let ids: Vec<String> = editor
                .items
                .iter()
                .filter(|i| i.is_selected())
                .map(|i| i.instance_id().to_string())
                .collect();
            for id in &ids {
                editor.set_margin(id, margin);
                editor.set_selected(id, false);
            }
            ids.len()
        });
        tracing::info!(count, margin = %margin, "Margin applied to selected items");
        count
    }

    // ========== Grouping ==========

    /// Category groups, reused until the structural version changes
    pub fn grouped(&mut self) -> Arc<Vec<CategoryGroup>> {
        self.grouping
            .groups(self.version, &self.items, &self.group_order)
    }

    pub fn set_group_order(&mut self, order: GroupOrder) {
        if self.group_order != order {
            self.group_order = order;
            self.grouping.invalidate();
        }
    }

    /// Order groups by the catalog display order
    pub fn set_category_order(&mut self, categories: &[Category]) {
        self.set_group_order(GroupOrder::DisplayOrder(CategoryOrder::from_categories(
            categories,
        )));
    }

    pub fn set_group_expanded(&mut self, label: &str, expanded: bool) {
        self.grouping.set_expanded(label, expanded);
    }

    // ========== Offer lifecycle ==========

    fn replace_items(&mut self, items: Vec<OfferLineItem>) {
        self.items = items;
        self.structure_changed();
    }

    /// Start a blank offer
    pub fn new_offer(&mut self) {
        self.header = OfferHeader::default();
        self.replace_items(Vec::new());
        tracing::info!("New offer started");
    }

    /// Load a saved offer for editing
    pub fn load_offer(&mut self, offer: &SavedOffer, rows: &[SavedOfferItem]) {
        self.header = OfferHeader {
            id: Some(offer.id),
            title: offer.title.clone(),
            category_order: offer.category_order.clone(),
        };
        self.replace_items(rows.iter().map(OfferLineItem::from_saved).collect());
        tracing::info!(offer_id = offer.id, items = rows.len(), "Offer loaded");
    }

    /// Start a new offer from a saved one's items
    pub fn load_as_template(&mut self, offer: &SavedOffer, rows: &[SavedOfferItem]) {
        self.header = OfferHeader {
            id: None,
            title: String::new(),
            category_order: offer.category_order.clone(),
        };
        self.replace_items(rows.iter().map(OfferLineItem::from_saved).collect());
        tracing::info!(template_id = offer.id, items = rows.len(), "Offer loaded as template");
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.header.title = title.into();
    }

    /// Category order used when exporting
    pub fn set_export_category_order(&mut self, order: Option<Vec<String>>) {
        self.header.category_order = order;
    }

    /// Validated header and rows for the store
    pub fn snapshot_for_save(&self, title: &str) -> AppResult<(OfferHeader, Vec<SavedOfferItem>)> {
        let header = OfferHeader {
            id: self.header.id,
            title: title.trim().to_string(),
            category_order: self.header.category_order.clone(),
        };
        let offer_id = header.id.unwrap_or_default();
        let rows: Vec<SavedOfferItem> = self.items.iter().map(|i| i.to_saved(offer_id)).collect();
        validate_offer(&header, &rows)?;
        Ok((header, rows))
    }

    /// Record the id the store assigned
    pub fn mark_saved(&mut self, offer_id: i64, title: &str) {
        self.header.id = Some(offer_id);
        self.header.title = title.trim().to_string();
        self.emit(OfferEvent::Saved { offer_id });
    }

    /// Forget the saved id so the next save creates a new offer
    pub fn detach_saved(&mut self) {
        self.header.id = None;
    }

    /// Catalog products not in the offer, filtered by name or code
    ///
    /// Matching is a case-insensitive substring search; a blank query keeps
    /// every product.
    pub fn available_products<'a>(&self, products: &'a [Product], query: &str) -> Vec<&'a Product> {
        let in_offer: HashSet<i64> = self.items.iter().filter_map(|i| i.product_id()).collect();
        let query = query.trim().to_lowercase();
        products
            .iter()
            .filter(|p| !in_offer.contains(&p.id))
            .filter(|p| {
                query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p
                        .code
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&query))
            })
            .collect()
    }

    // ========== Reordering ==========

    /// Open a reorder session on a copy of the current order
    pub fn begin_reorder(&self) -> ReorderSession {
        ReorderSession::begin(&self.items)
    }

    /// Replace the item order in one step
    ///
    /// Ids no longer in the offer are skipped; items missing from `order`
    /// keep their relative order at the end. Returns how many items were
    /// placed from `order`.
    pub fn replace_order(&mut self, order: &[String]) -> usize {
        let mut remaining: Vec<Option<OfferLineItem>> =
            std::mem::take(&mut self.items).into_iter().map(Some).collect();
        let index: HashMap<String, usize> = remaining
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (item.instance_id().to_string(), i)))
            .collect();
        let mut reordered = Vec::with_capacity(remaining.len());

        for id in order {
            if let Some(&i) = index.get(id)
                && let Some(item) = remaining[i].take()
            {
                reordered.push(item);
            }
        }
        let placed = reordered.len();
        reordered.extend(remaining.into_iter().flatten());

        self.replace_items(reordered);
        tracing::info!(placed, total = self.items.len(), "Offer order replaced");
        placed
    }
}

impl Default for OfferEditor {
    fn default() -> Self {
        Self::new(Duration::from_millis(SUMMARY_DEBOUNCE_MS))
    }
}
