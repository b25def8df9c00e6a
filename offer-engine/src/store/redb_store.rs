//! redb-backed catalog and offer store
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `categories` | `category_id` | `Category` |
//! | `products` | `product_id` | `Product` |
//! | `offers` | `offer_id` | `SavedOffer` |
//! | `offer_items` | `(offer_id, position)` | `SavedOfferItem` |
//! | `business_card` | `"card"` | `BusinessCard` |
//! | `sequences` | entity name | last assigned id |
//!
//! Values are JSON. Item position is the offer order, so a range scan over
//! one offer returns its items already ordered.

use super::{CatalogStore, OfferStore, StorageError, StorageResult};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use rust_decimal::Decimal;
use shared::models::{
    BusinessCard, Category, CategoryCreate, DEFAULT_UNIT, DEFAULT_VAT_RATE, OfferHeader, Product,
    ProductCreate, SavedOffer, SavedOfferItem, UNRANKED_DISPLAY_ORDER,
};
use shared::util::now_millis;
use std::path::Path;
use std::sync::Arc;

const CATEGORIES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("categories");

const PRODUCTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("products");

const OFFERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("offers");

/// key = (offer_id, position)
const OFFER_ITEMS_TABLE: TableDefinition<(i64, u32), &[u8]> = TableDefinition::new("offer_items");

const BUSINESS_CARD_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("business_card");

const SEQUENCES_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequences");

const BUSINESS_CARD_KEY: &str = "card";
const CATEGORY_SEQ: &str = "category";
const PRODUCT_SEQ: &str = "product";
const OFFER_SEQ: &str = "offer";

/// Embedded store for catalog data and saved offers
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open a database that lives only in memory
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(OFFERS_TABLE)?;
            let _ = write_txn.open_table(OFFER_ITEMS_TABLE)?;
            let _ = write_txn.open_table(BUSINESS_CARD_TABLE)?;
            let _ = write_txn.open_table(SEQUENCES_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Increment and return the id sequence for `entity`
    fn next_id(txn: &WriteTransaction, entity: &str) -> StorageResult<i64> {
        let mut table = txn.open_table(SEQUENCES_TABLE)?;
        let current = table.get(entity)?.map(|guard| guard.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(entity, next)?;
        Ok(next as i64)
    }

    /// Keep the sequence ahead of an explicitly chosen id
    fn bump_sequence(txn: &WriteTransaction, entity: &str, id: i64) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCES_TABLE)?;
        let current = table.get(entity)?.map(|guard| guard.value()).unwrap_or(0);
        let id = u64::try_from(id).unwrap_or(0);
        if id > current {
            table.insert(entity, id)?;
        }
        Ok(())
    }

    // ========== Catalog writes ==========

    /// Insert or replace a category under its own id
    pub fn put_category(&self, category: &Category) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;
            let value = serde_json::to_vec(category)?;
            table.insert(category.id, value.as_slice())?;
        }
        Self::bump_sequence(&txn, CATEGORY_SEQ, category.id)?;
        txn.commit()?;
        Ok(())
    }

    pub fn create_category(&self, data: CategoryCreate) -> StorageResult<Category> {
        let txn = self.db.begin_write()?;
        let category = Category {
            id: Self::next_id(&txn, CATEGORY_SEQ)?,
            name: data.name.trim().to_string(),
            default_margin: data.default_margin.unwrap_or(Decimal::ZERO),
            display_order: data.display_order.unwrap_or(UNRANKED_DISPLAY_ORDER),
        };
        {
            let mut table = txn.open_table(CATEGORIES_TABLE)?;
            let value = serde_json::to_vec(&category)?;
            table.insert(category.id, value.as_slice())?;
        }
        txn.commit()?;
        tracing::debug!(category_id = category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Insert or replace a product under its own id
    pub fn put_product(&self, product: &Product) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let value = serde_json::to_vec(product)?;
            table.insert(product.id, value.as_slice())?;
        }
        Self::bump_sequence(&txn, PRODUCT_SEQ, product.id)?;
        txn.commit()?;
        Ok(())
    }

    pub fn create_product(&self, data: ProductCreate) -> StorageResult<Product> {
        let txn = self.db.begin_write()?;
        {
            let categories = txn.open_table(CATEGORIES_TABLE)?;
            if categories.get(data.category_id)?.is_none() {
                return Err(StorageError::CategoryNotFound(data.category_id));
            }
        }
        let unit = data
            .unit
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());
        let product = Product {
            id: Self::next_id(&txn, PRODUCT_SEQ)?,
            code: data.code.filter(|c| !c.trim().is_empty()),
            name: data.name.trim().to_string(),
            unit,
            purchase_price_net: data.purchase_price_net,
            price_updated_at: Some(now_millis()),
            vat_rate: data.vat_rate.unwrap_or(DEFAULT_VAT_RATE),
            category_id: data.category_id,
        };
        {
            let mut table = txn.open_table(PRODUCTS_TABLE)?;
            let value = serde_json::to_vec(&product)?;
            table.insert(product.id, value.as_slice())?;
        }
        txn.commit()?;
        Ok(product)
    }

    pub fn put_business_card(&self, card: &BusinessCard) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(BUSINESS_CARD_TABLE)?;
            let value = serde_json::to_vec(card)?;
            table.insert(BUSINESS_CARD_KEY, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }
}

impl CatalogStore for RedbStore {
    fn get_categories(&self) -> StorageResult<Vec<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORIES_TABLE)?;

        let mut categories = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let category: Category = serde_json::from_slice(value.value())?;
            categories.push(category);
        }

        categories.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(categories)
    }

    fn get_category(&self, id: i64) -> StorageResult<Option<Category>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATEGORIES_TABLE)?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn get_product(&self, id: i64) -> StorageResult<Option<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn get_products_by_category(&self, category_id: i64) -> StorageResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS_TABLE)?;

        let mut products = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let product: Product = serde_json::from_slice(value.value())?;
            if product.category_id == category_id {
                products.push(product);
            }
        }

        products.sort_by_cached_key(|p| p.name.to_lowercase());
        Ok(products)
    }

    fn get_business_card(&self) -> StorageResult<Option<BusinessCard>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BUSINESS_CARD_TABLE)?;

        match table.get(BUSINESS_CARD_KEY)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }
}

impl OfferStore for RedbStore {
    fn save_offer(&self, header: &OfferHeader, items: &[SavedOfferItem]) -> StorageResult<i64> {
        let now = now_millis();
        let txn = self.db.begin_write()?;

        let offer = match header.id {
            Some(id) => {
                let table = txn.open_table(OFFERS_TABLE)?;
                let existing: SavedOffer = match table.get(id)? {
                    Some(value) => serde_json::from_slice(value.value())?,
                    None => return Err(StorageError::OfferNotFound(id)),
                };
                SavedOffer {
                    id,
                    title: header.title.clone(),
                    created_at: existing.created_at,
                    modified_at: now,
                    category_order: header.category_order.clone(),
                }
            }
            None => SavedOffer {
                id: Self::next_id(&txn, OFFER_SEQ)?,
                title: header.title.clone(),
                created_at: now,
                modified_at: now,
                category_order: header.category_order.clone(),
            },
        };

        {
            let mut offers = txn.open_table(OFFERS_TABLE)?;
            let value = serde_json::to_vec(&offer)?;
            offers.insert(offer.id, value.as_slice())?;
        }

        {
            let mut table = txn.open_table(OFFER_ITEMS_TABLE)?;

            let mut stale: Vec<(i64, u32)> = Vec::new();
            for result in table.range((offer.id, 0u32)..=(offer.id, u32::MAX))? {
                let (key, _value) = result?;
                stale.push(key.value());
            }
            for key in stale {
                table.remove(key)?;
            }

            for (position, item) in items.iter().enumerate() {
                let row = SavedOfferItem {
                    offer_id: offer.id,
                    ..item.clone()
                };
                let value = serde_json::to_vec(&row)?;
                table.insert((offer.id, position as u32), value.as_slice())?;
            }
        }

        txn.commit()?;
        tracing::info!(offer_id = offer.id, items = items.len(), "Offer saved");
        Ok(offer.id)
    }

    fn load_offer_items(&self, offer_id: i64) -> StorageResult<Vec<SavedOfferItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OFFER_ITEMS_TABLE)?;

        let mut items = Vec::new();
        for result in table.range((offer_id, 0u32)..=(offer_id, u32::MAX))? {
            let (_key, value) = result?;
            let item: SavedOfferItem = serde_json::from_slice(value.value())?;
            items.push(item);
        }
        Ok(items)
    }

    fn get_offer(&self, offer_id: i64) -> StorageResult<Option<SavedOffer>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OFFERS_TABLE)?;

        match table.get(offer_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn get_saved_offers(&self) -> StorageResult<Vec<SavedOffer>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OFFERS_TABLE)?;

        let mut offers = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let offer: SavedOffer = serde_json::from_slice(value.value())?;
            offers.push(offer);
        }

        offers.sort_by(|a, b| b.modified_at.cmp(&a.modified_at).then(b.id.cmp(&a.id)));
        Ok(offers)
    }

    fn delete_offer(&self, offer_id: i64) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut offers = txn.open_table(OFFERS_TABLE)?;
            offers.remove(offer_id)?.is_some()
        };
        {
            let mut table = txn.open_table(OFFER_ITEMS_TABLE)?;
            let mut keys: Vec<(i64, u32)> = Vec::new();
            for result in table.range((offer_id, 0u32)..=(offer_id, u32::MAX))? {
                let (key, _value) = result?;
                keys.push(key.value());
            }
            for key in keys {
                table.remove(key)?;
            }
        }
        txn.commit()?;

        if existed {
            tracing::info!(offer_id, "Offer deleted");
        } else {
            tracing::warn!(offer_id, "Delete requested for unknown offer");
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, display_order: i32) -> Category {
        Category {
            id,
            name: name.to_string(),
            default_margin: Decimal::from(20),
            display_order,
        }
    }

    fn product(id: i64, name: &str, category_id: i64) -> Product {
        Product {
            id,
            code: None,
            name: name.to_string(),
            unit: DEFAULT_UNIT.to_string(),
            purchase_price_net: Decimal::from(10),
            price_updated_at: None,
            vat_rate: Decimal::from(23),
            category_id,
        }
    }

    fn row(name: &str, quantity: i64) -> SavedOfferItem {
        SavedOfferItem {
            offer_id: 0,
            product_id: None,
            name: name.to_string(),
            custom_name: None,
            category_name: Some("Tools".to_string()),
            unit: DEFAULT_UNIT.to_string(),
            purchase_price_net: Decimal::from(100),
            vat_rate: Decimal::from(23),
            margin: Decimal::from(20),
            quantity: Decimal::from(quantity),
        }
    }

    fn header(id: Option<i64>, title: &str) -> OfferHeader {
        OfferHeader {
            id,
            title: title.to_string(),
            category_order: None,
        }
    }

    #[test]
    fn test_categories_sorted_by_display_order() {
        let store = RedbStore::open_in_memory().unwrap();
        store.put_category(&category(1, "Lamps", 2)).unwrap();
        store.put_category(&category(2, "Cables", 1)).unwrap();
        store.put_category(&category(3, "Boxes", 2)).unwrap();

        let names: Vec<String> = store
            .get_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Cables", "Boxes", "Lamps"]);
        assert_eq!(store.get_category(2).unwrap().unwrap().name, "Cables");
        assert!(store.get_category(99).unwrap().is_none());
    }

    #[test]
    fn test_create_after_put_continues_sequence() {
        let store = RedbStore::open_in_memory().unwrap();
        store.put_category(&category(5, "Lamps", 1)).unwrap();

        let created = store
            .create_category(CategoryCreate {
                name: " Cables ".to_string(),
                default_margin: None,
                display_order: None,
            })
            .unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(created.name, "Cables");
        assert_eq!(created.display_order, UNRANKED_DISPLAY_ORDER);
    }

    #[test]
    fn test_products_by_category() {
        let store = RedbStore::open_in_memory().unwrap();
        store.put_category(&category(1, "Lamps", 1)).unwrap();
        store.put_product(&product(1, "spot", 1)).unwrap();
        store.put_product(&product(2, "Bulb", 1)).unwrap();
        store.put_product(&product(3, "Cable", 2)).unwrap();

        let names: Vec<String> = store
            .get_products_by_category(1)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Bulb", "spot"]);
        assert_eq!(store.get_product(3).unwrap().unwrap().category_id, 2);
        assert!(store.get_product(9).unwrap().is_none());

        let created = store
            .create_product(ProductCreate {
                code: Some("  ".to_string()),
                name: "Dimmer".to_string(),
                unit: None,
                purchase_price_net: Decimal::from(15),
                vat_rate: None,
                category_id: 1,
            })
            .unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.unit, DEFAULT_UNIT);
        assert_eq!(created.vat_rate, DEFAULT_VAT_RATE);
        assert!(created.code.is_none());
    }

    #[test]
    fn test_create_product_requires_category() {
        let store = RedbStore::open_in_memory().unwrap();
        let err = store
            .create_product(ProductCreate {
                code: None,
                name: "Orphan".to_string(),
                unit: None,
                purchase_price_net: Decimal::ONE,
                vat_rate: None,
                category_id: 42,
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::CategoryNotFound(42)));
    }

    #[test]
    fn test_business_card() {
        let store = RedbStore::open_in_memory().unwrap();
        assert!(store.get_business_card().unwrap().is_none());

        let card = BusinessCard {
            company: "Acme".to_string(),
            full_name: "Jan Kowalski".to_string(),
            phone: "+48 600 000 000".to_string(),
            email: "jan@acme.test".to_string(),
        };
        store.put_business_card(&card).unwrap();
        assert_eq!(store.get_business_card().unwrap(), Some(card));
    }

    #[test]
    fn test_save_and_load_keeps_order() {
        let store = RedbStore::open_in_memory().unwrap();
        let id = store
            .save_offer(&header(None, "Kitchen"), &[row("C", 1), row("A", 2), row("B", 3)])
            .unwrap();

        let items = store.load_offer_items(id).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert!(items.iter().all(|i| i.offer_id == id));
        assert_eq!(items[1].quantity, Decimal::from(2));
    }

    #[test]
    fn test_resave_replaces_all_items() {
        let store = RedbStore::open_in_memory().unwrap();
        let id = store
            .save_offer(&header(None, "Kitchen"), &[row("A", 1), row("B", 1), row("C", 1)])
            .unwrap();
        let created_at = store.get_offer(id).unwrap().unwrap().created_at;

        let mut updated = header(Some(id), "Kitchen v2");
        updated.category_order = Some(vec!["Tools".to_string()]);
        let same_id = store.save_offer(&updated, &[row("Z", 5)]).unwrap();
        assert_eq!(same_id, id);

        let items = store.load_offer_items(id).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Z");

        let offer = store.get_offer(id).unwrap().unwrap();
        assert_eq!(offer.title, "Kitchen v2");
        assert_eq!(offer.created_at, created_at);
        assert_eq!(offer.category_order, Some(vec!["Tools".to_string()]));
    }

    #[test]
    fn test_save_unknown_id_fails() {
        let store = RedbStore::open_in_memory().unwrap();
        let err = store.save_offer(&header(Some(7), "Ghost"), &[row("A", 1)]).unwrap_err();
        assert!(matches!(err, StorageError::OfferNotFound(7)));
        assert!(store.get_saved_offers().unwrap().is_empty());
    }

    #[test]
    fn test_delete_offer_removes_items_only_for_that_offer() {
        let store = RedbStore::open_in_memory().unwrap();
        let first = store.save_offer(&header(None, "First"), &[row("A", 1)]).unwrap();
        let second = store.save_offer(&header(None, "Second"), &[row("B", 1)]).unwrap();

        assert!(store.delete_offer(first).unwrap());
        assert!(!store.delete_offer(first).unwrap());

        assert!(store.get_offer(first).unwrap().is_none());
        assert!(store.load_offer_items(first).unwrap().is_empty());
        assert_eq!(store.load_offer_items(second).unwrap().len(), 1);

        let listed: Vec<i64> = store.get_saved_offers().unwrap().iter().map(|o| o.id).collect();
        assert_eq!(listed, vec![second]);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offers.redb");

        let id = {
            let store = RedbStore::open(&path).unwrap();
            store.put_category(&category(1, "Lamps", 1)).unwrap();
            store.save_offer(&header(None, "Persisted"), &[row("A", 1)]).unwrap()
        };

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get_offer(id).unwrap().unwrap().title, "Persisted");
        assert_eq!(store.get_categories().unwrap().len(), 1);
        assert_eq!(store.load_offer_items(id).unwrap()[0].name, "A");
    }

    #[test]
    fn test_storage_error_maps_to_app_error() {
        use shared::error::{AppError, ErrorCode};

        let err: AppError = StorageError::OfferNotFound(3).into();
        assert_eq!(err.code, ErrorCode::OfferNotFound);

        let err: AppError = StorageError::CategoryNotFound(4).into();
        assert_eq!(err.code, ErrorCode::CategoryNotFound);
    }
}
