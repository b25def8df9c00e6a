//! Offer line item
//!
//! A line item is a self-contained snapshot of a catalog product plus the
//! pricing the user negotiates on top of it. Margin and net sale price are
//! two views of the same number:
//!
//! ```text
//! sale_price_net = round(purchase_price_net × (1 + margin / 100))
//! margin         = round((sale_price_net / purchase_price_net − 1) × 100)   // purchase > 0 only
//! ```
//!
//! Setting one updates the other through the `Reconcile` guard: the mirror
//! setter never re-enters its own counterpart while the forward update is
//! running. Every setter reports what changed as a [`FieldChanges`] set so the
//! owner can publish notifications without the item knowing who listens.

use crate::money::{
    self, apply_markup, gross_from_net, markup_from_prices, percent_of, round_money,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Category, DEFAULT_UNIT, DEFAULT_VAT_RATE, Product, SavedOfferItem};

/// Observable fields of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Name,
    CustomName,
    CategoryName,
    Unit,
    PurchasePriceNet,
    VatRate,
    Margin,
    Quantity,
    SalePriceNet,
    SalePriceGross,
    TotalNet,
    VatAmount,
    TotalGross,
    IsSelected,
}

impl ItemField {
    /// Fields whose change moves the offer totals
    pub fn affects_totals(self) -> bool {
        matches!(
            self,
            ItemField::TotalNet | ItemField::VatAmount | ItemField::TotalGross
        )
    }

    /// Fields whose change moves the item between category groups
    pub fn affects_grouping(self) -> bool {
        matches!(self, ItemField::CategoryName)
    }
}

/// Set of fields changed by a single mutation, in first-changed order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChanges(Vec<ItemField>);

impl FieldChanges {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(fields: &[ItemField]) -> Self {
        let mut changes = Self::none();
        for field in fields {
            changes.insert(*field);
        }
        changes
    }

    pub fn insert(&mut self, field: ItemField) {
        if !self.0.contains(&field) {
            self.0.push(field);
        }
    }

    pub fn extend(&mut self, other: FieldChanges) {
        for field in other.0 {
            self.insert(field);
        }
    }

    pub fn contains(&self, field: ItemField) -> bool {
        self.0.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemField> + '_ {
        self.0.iter().copied()
    }

    pub fn affects_totals(&self) -> bool {
        self.0.iter().any(|f| f.affects_totals())
    }

    pub fn affects_grouping(&self) -> bool {
        self.0.iter().any(|f| f.affects_grouping())
    }
}

const TOTALS: [ItemField; 3] = [ItemField::TotalNet, ItemField::VatAmount, ItemField::TotalGross];

/// Fallbacks for seeding items from the catalog and for unparsable VAT text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDefaults {
    pub vat_rate: Decimal,
    pub unit: String,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            vat_rate: DEFAULT_VAT_RATE,
            unit: DEFAULT_UNIT.to_string(),
        }
    }
}

/// Which half of the margin/price pair is currently being written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Reconcile {
    #[default]
    Idle,
    UpdatingMargin,
    UpdatingSalePrice,
}

/// One product-quantity-pricing row of an offer
#[derive(Debug, Clone, PartialEq)]
pub struct OfferLineItem {
    instance_id: String,
    product_id: Option<i64>,
    name: String,
    custom_name: Option<String>,
    category_name: Option<String>,
    unit: String,
    purchase_price_net: Decimal,
    vat_rate: Decimal,
    margin: Decimal,
    quantity: Decimal,
    sale_price_net: Decimal,
    /// Bulk-operation selection, never persisted
    is_selected: bool,
    reconcile: Reconcile,
}

impl OfferLineItem {
    /// New item with zero margin and quantity 1
    ///
    /// Negative purchase prices are clamped to zero and the VAT rate to 0..=100.
    pub fn new(name: impl Into<String>, purchase_price_net: Decimal, vat_rate: Decimal) -> Self {
        let purchase_price_net = round_money(purchase_price_net.max(Decimal::ZERO));
        Self {
            instance_id: uuid::Uuid::new_v4().to_string(),
            product_id: None,
            name: name.into(),
            custom_name: None,
            category_name: None,
            unit: DEFAULT_UNIT.to_string(),
            purchase_price_net,
            vat_rate: vat_rate.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
            margin: Decimal::ZERO,
            quantity: Decimal::ONE,
            sale_price_net: purchase_price_net,
            is_selected: false,
            reconcile: Reconcile::Idle,
        }
    }

    pub fn with_margin(mut self, margin: Decimal) -> Self {
        self.set_margin(margin);
        self
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.set_quantity(quantity);
        self
    }

    pub fn with_category(mut self, category_name: impl Into<String>) -> Self {
        self.set_category_name(Some(category_name.into()));
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.set_unit(unit);
        self
    }

    pub fn with_product_id(mut self, product_id: i64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn with_custom_name(mut self, custom_name: impl Into<String>) -> Self {
        self.set_custom_name(Some(custom_name.into()));
        self
    }

    /// Seed an item from a catalog product and the default margin of its category
    pub fn from_product(
        product: &Product,
        category: Option<&Category>,
        defaults: &ItemDefaults,
    ) -> Self {
        let unit = if product.unit.trim().is_empty() {
            defaults.unit.as_str()
        } else {
            product.unit.as_str()
        };
        let mut item = Self::new(&product.name, product.purchase_price_net, product.vat_rate)
            .with_product_id(product.id)
            .with_unit(unit);
        if let Some(category) = category {
            item = item
                .with_category(&category.name)
                .with_margin(category.default_margin);
        }
        item
    }

    /// Rebuild an item from a stored row
    ///
    /// The sale price is re-derived from the stored margin.
    pub fn from_saved(row: &SavedOfferItem) -> Self {
        let mut item = Self::new(&row.name, row.purchase_price_net, row.vat_rate)
            .with_unit(&row.unit)
            .with_margin(row.margin)
            .with_quantity(row.quantity);
        item.product_id = row.product_id;
        item.custom_name = row.custom_name.clone().filter(|n| !n.trim().is_empty());
        item.category_name = row.category_name.clone().filter(|c| !c.trim().is_empty());
        item
    }

    /// Snapshot for persistence
    pub fn to_saved(&self, offer_id: i64) -> SavedOfferItem {
        SavedOfferItem {
            offer_id,
            product_id: self.product_id,
            name: self.name.clone(),
            custom_name: self.custom_name.clone(),
            category_name: self.category_name.clone(),
            unit: self.unit.clone(),
            purchase_price_net: self.purchase_price_net,
            vat_rate: self.vat_rate,
            margin: self.margin,
            quantity: self.quantity,
        }
    }

    // ========== Accessors ==========

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn product_id(&self) -> Option<i64> {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    /// Custom name when set, product name otherwise
    pub fn display_name(&self) -> &str {
        self.custom_name.as_deref().unwrap_or(&self.name)
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category_name.as_deref()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn purchase_price_net(&self) -> Decimal {
        self.purchase_price_net
    }

    pub fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    pub fn margin(&self) -> Decimal {
        self.margin
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn sale_price_net(&self) -> Decimal {
        self.sale_price_net
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    // ========== Derived values ==========

    pub fn sale_price_gross(&self) -> Decimal {
        gross_from_net(self.sale_price_net, self.vat_rate)
    }

    pub fn total_net(&self) -> Decimal {
        round_money(self.sale_price_net * self.quantity)
    }

    pub fn vat_amount(&self) -> Decimal {
        round_money(percent_of(self.total_net(), self.vat_rate))
    }

    pub fn total_gross(&self) -> Decimal {
        self.total_net() + self.vat_amount()
    }

    // ========== Pricing setters ==========

    /// Set the margin and re-derive the net sale price
    pub fn set_margin(&mut self, margin: Decimal) -> FieldChanges {
        let margin = round_money(margin);
        if self.margin == margin {
            return FieldChanges::none();
        }
        self.margin = margin;
        let mut changes = FieldChanges::of(&[ItemField::Margin]);

        if self.reconcile == Reconcile::Idle {
            self.reconcile = Reconcile::UpdatingMargin;
            let price = apply_markup(self.purchase_price_net, margin);
            changes.extend(self.write_sale_price(price));
            self.reconcile = Reconcile::Idle;
        }
        changes
    }

    /// Set the net sale price and re-derive the margin
    ///
    /// With a zero purchase price the margin is undefined and stays as is.
    /// Negative entries are ignored; a margin below -100% still derives a
    /// negative price.
    pub fn set_sale_price_net(&mut self, price: Decimal) -> FieldChanges {
        let price = round_money(price);
        if price < Decimal::ZERO {
            return FieldChanges::none();
        }
        self.write_sale_price(price)
    }

    fn write_sale_price(&mut self, price: Decimal) -> FieldChanges {
        if self.sale_price_net == price {
            return FieldChanges::none();
        }
        self.sale_price_net = price;
        let mut changes = FieldChanges::of(&[ItemField::SalePriceNet, ItemField::SalePriceGross]);
        changes.extend(FieldChanges::of(&TOTALS));

        if self.reconcile == Reconcile::Idle
            && let Some(margin) = markup_from_prices(self.purchase_price_net, price)
        {
            self.reconcile = Reconcile::UpdatingSalePrice;
            changes.extend(self.set_margin(margin));
            self.reconcile = Reconcile::Idle;
        }
        changes
    }

    /// Set the quantity; negative values are ignored
    pub fn set_quantity(&mut self, quantity: Decimal) -> FieldChanges {
        if quantity < Decimal::ZERO || self.quantity == quantity {
            return FieldChanges::none();
        }
        self.quantity = quantity;
        let mut changes = FieldChanges::of(&[ItemField::Quantity]);
        changes.extend(FieldChanges::of(&TOTALS));
        changes
    }

    /// Set the VAT rate; values outside 0..=100 are ignored
    pub fn set_vat_rate(&mut self, vat_rate: Decimal) -> FieldChanges {
        if vat_rate < Decimal::ZERO || vat_rate > Decimal::ONE_HUNDRED || self.vat_rate == vat_rate
        {
            return FieldChanges::none();
        }
        self.vat_rate = vat_rate;
        FieldChanges::of(&[
            ItemField::VatRate,
            ItemField::SalePriceGross,
            ItemField::VatAmount,
            ItemField::TotalGross,
        ])
    }

    /// Set the purchase price, keeping the margin and re-deriving the sale price
    pub fn set_purchase_price_net(&mut self, price: Decimal) -> FieldChanges {
        let price = round_money(price);
        if price < Decimal::ZERO || self.purchase_price_net == price {
            return FieldChanges::none();
        }
        self.purchase_price_net = price;
        let mut changes = FieldChanges::of(&[ItemField::PurchasePriceNet]);

        self.reconcile = Reconcile::UpdatingMargin;
        changes.extend(self.write_sale_price(apply_markup(price, self.margin)));
        self.reconcile = Reconcile::Idle;
        changes
    }

    // ========== Text-bound setters ==========

    /// Unparsable margin text leaves the margin unchanged
    pub fn set_margin_text(&mut self, text: &str) -> FieldChanges {
        match money::parse_decimal(text) {
            Some(margin) => self.set_margin(margin),
            None => FieldChanges::none(),
        }
    }

    /// Unparsable price text sets the price to zero
    pub fn set_sale_price_text(&mut self, text: &str) -> FieldChanges {
        self.set_sale_price_net(money::parse_price(text))
    }

    pub fn set_purchase_price_text(&mut self, text: &str) -> FieldChanges {
        self.set_purchase_price_net(money::parse_price(text))
    }

    /// Unparsable or negative quantity text leaves the quantity unchanged
    pub fn set_quantity_text(&mut self, text: &str) -> FieldChanges {
        match money::parse_quantity(text) {
            Some(quantity) => self.set_quantity(quantity),
            None => FieldChanges::none(),
        }
    }

    pub fn set_vat_rate_text(&mut self, text: &str, default: Decimal) -> FieldChanges {
        self.set_vat_rate(money::parse_vat_rate(text, default))
    }

    // ========== Snapshot setters ==========

    pub fn set_name(&mut self, name: impl Into<String>) -> FieldChanges {
        let name = name.into();
        if self.name == name {
            return FieldChanges::none();
        }
        self.name = name;
        FieldChanges::of(&[ItemField::Name])
    }

    /// Blank custom names clear the override
    pub fn set_custom_name(&mut self, custom_name: Option<String>) -> FieldChanges {
        let custom_name = custom_name.filter(|n| !n.trim().is_empty());
        if self.custom_name == custom_name {
            return FieldChanges::none();
        }
        self.custom_name = custom_name;
        FieldChanges::of(&[ItemField::CustomName])
    }

    /// Blank category names mean "uncategorized"
    pub fn set_category_name(&mut self, category_name: Option<String>) -> FieldChanges {
        let category_name = category_name.filter(|c| !c.trim().is_empty());
        if self.category_name == category_name {
            return FieldChanges::none();
        }
        self.category_name = category_name;
        FieldChanges::of(&[ItemField::CategoryName])
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) -> FieldChanges {
        let unit = unit.into();
        if self.unit == unit {
            return FieldChanges::none();
        }
        self.unit = unit;
        FieldChanges::of(&[ItemField::Unit])
    }

    pub fn set_selected(&mut self, selected: bool) -> FieldChanges {
        if self.is_selected == selected {
            return FieldChanges::none();
        }
        self.is_selected = selected;
        FieldChanges::of(&[ItemField::IsSelected])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(purchase: &str) -> OfferLineItem {
        OfferLineItem::new("Cable 3x2.5", dec(purchase), dec("23"))
    }

    #[test]
    fn test_pricing_scenario() {
        let mut it = item("100.00");
        it.set_margin(dec("20"));
        assert_eq!(it.sale_price_net(), dec("120.00"));
        assert_eq!(it.sale_price_gross(), dec("147.60"));

        it.set_quantity(dec("2"));
        assert_eq!(it.total_net(), dec("240.00"));
        assert_eq!(it.vat_amount(), dec("55.20"));
        assert_eq!(it.total_gross(), dec("295.20"));
    }

    #[test]
    fn test_set_margin_derives_price_without_drift() {
        let mut it = item("37.19");
        let changes = it.set_margin(dec("17.333"));

        assert_eq!(it.margin(), dec("17.33"));
        assert_eq!(it.sale_price_net(), round_money(dec("37.19") * dec("1.1733")));
        assert!(changes.contains(ItemField::Margin));
        assert!(changes.contains(ItemField::SalePriceNet));
        assert!(changes.contains(ItemField::SalePriceGross));
        assert!(changes.affects_totals());
    }

    #[test]
    fn test_set_margin_twice_is_noop() {
        let mut it = item("100");
        assert!(!it.set_margin(dec("12.5")).is_empty());
        let before = it.clone();

        let changes = it.set_margin(dec("12.5"));
        assert!(changes.is_empty());
        assert_eq!(it, before);

        // same value after rounding
        assert!(it.set_margin(dec("12.501")).is_empty());
    }

    #[test]
    fn test_set_sale_price_derives_margin() {
        let mut it = item("80");
        let changes = it.set_sale_price_net(dec("100"));

        assert_eq!(it.sale_price_net(), dec("100.00"));
        assert_eq!(it.margin(), dec("25.00"));
        assert!(changes.contains(ItemField::Margin));
        assert!(changes.contains(ItemField::TotalGross));
    }

    #[test]
    fn test_set_sale_price_keeps_entered_price() {
        // 10 / 3 = 33.33...% margin; the reverse path must not snap the price
        let mut it = item("3");
        it.set_sale_price_net(dec("4"));
        assert_eq!(it.margin(), dec("33.33"));
        assert_eq!(it.sale_price_net(), dec("4.00"));
    }

    #[test]
    fn test_zero_purchase_price_keeps_margin() {
        let mut it = item("0").with_margin(dec("15"));
        assert_eq!(it.sale_price_net(), Decimal::ZERO);

        let changes = it.set_sale_price_net(dec("49.99"));
        assert_eq!(it.sale_price_net(), dec("49.99"));
        assert_eq!(it.margin(), dec("15"));
        assert!(!changes.contains(ItemField::Margin));
    }

    #[test]
    fn test_negative_margin_allowed() {
        let mut it = item("200");
        it.set_margin(dec("-25"));
        assert_eq!(it.sale_price_net(), dec("150.00"));
        assert_eq!(it.margin(), dec("-25"));
    }

    #[test]
    fn test_margin_below_minus_hundred_goes_negative() {
        let mut it = item("100").with_margin(dec("20"));

        let changes = it.set_margin(dec("-100"));
        assert_eq!(it.sale_price_net(), Decimal::ZERO);
        assert!(changes.contains(ItemField::SalePriceNet));

        let changes = it.set_margin(dec("-150"));
        assert_eq!(it.margin(), dec("-150"));
        assert_eq!(it.sale_price_net(), dec("-50.00"));
        assert!(changes.contains(ItemField::SalePriceNet));
        assert_eq!(it.total_net(), dec("-50.00"));
        assert_eq!(it.total_gross(), dec("-61.50"));

        // kept margin follows a new purchase price
        it.set_purchase_price_net(dec("200"));
        assert_eq!(it.sale_price_net(), dec("-100.00"));

        // typed negative prices are still rejected
        assert!(it.set_sale_price_net(dec("-10")).is_empty());
        assert_eq!(it.sale_price_net(), dec("-100.00"));
    }

    #[test]
    fn test_margin_price_properties_sweep() {
        let purchases = ["0", "3", "7", "37.19", "100"];
        let margins = ["-150", "-100", "-0.005", "0", "12.345", "1000"];

        for purchase in purchases {
            for margin in margins {
                let mut it = item(purchase);
                it.set_margin(dec(margin));
                let ppn = it.purchase_price_net();
                let m = it.margin();

                assert_eq!(m, round_money(dec(margin)), "margin {purchase} @ {margin}");
                assert_eq!(
                    it.sale_price_net(),
                    round_money(ppn * (Decimal::ONE + m / Decimal::ONE_HUNDRED)),
                    "forward {purchase} @ {margin}"
                );

                let before = it.clone();
                assert!(it.set_margin(dec(margin)).is_empty(), "idempotent {purchase} @ {margin}");
                assert_eq!(it, before);
            }
        }

        let prices = ["0", "0.01", "1", "4", "99.99", "250"];
        for purchase in purchases.iter().filter(|p| **p != "0") {
            for price in prices {
                let mut it = item(purchase);
                it.set_sale_price_net(dec(price));
                let ppn = it.purchase_price_net();

                assert_eq!(it.sale_price_net(), dec(price), "kept {purchase} -> {price}");
                assert_eq!(
                    it.margin(),
                    round_money((dec(price) / ppn - Decimal::ONE) * Decimal::ONE_HUNDRED),
                    "reverse {purchase} -> {price}"
                );
            }
        }
    }

    #[test]
    fn test_quantity_changes() {
        let mut it = item("10");
        let changes = it.set_quantity(dec("1.5"));
        assert!(changes.contains(ItemField::Quantity));
        assert!(changes.contains(ItemField::TotalNet));
        assert!(!changes.contains(ItemField::SalePriceNet));
        assert_eq!(it.total_net(), dec("15.00"));

        assert!(it.set_quantity(dec("-1")).is_empty());
        assert_eq!(it.quantity(), dec("1.5"));
    }

    #[test]
    fn test_purchase_price_keeps_margin() {
        let mut it = item("100").with_margin(dec("10"));
        let changes = it.set_purchase_price_net(dec("200"));

        assert_eq!(it.margin(), dec("10"));
        assert_eq!(it.sale_price_net(), dec("220.00"));
        assert!(changes.contains(ItemField::PurchasePriceNet));
        assert!(!changes.contains(ItemField::Margin));
    }

    #[test]
    fn test_vat_rate_bounds() {
        let mut it = item("100");
        assert!(it.set_vat_rate(dec("101")).is_empty());
        assert!(it.set_vat_rate(dec("-1")).is_empty());

        let changes = it.set_vat_rate(dec("8"));
        assert!(changes.contains(ItemField::SalePriceGross));
        assert!(!changes.contains(ItemField::TotalNet));
        assert_eq!(it.sale_price_gross(), dec("108.00"));
    }

    #[test]
    fn test_text_setters_coerce() {
        let mut it = item("100").with_margin(dec("20"));

        assert!(it.set_margin_text("abc").is_empty());
        assert_eq!(it.margin(), dec("20"));

        it.set_margin_text("12,5%");
        assert_eq!(it.margin(), dec("12.5"));

        it.set_sale_price_text("not a price");
        assert_eq!(it.sale_price_net(), Decimal::ZERO);
        assert_eq!(it.margin(), dec("-100"));

        assert!(it.set_quantity_text("-3").is_empty());
        it.set_quantity_text("4");
        assert_eq!(it.quantity(), dec("4"));

        it.set_vat_rate_text("", dec("23"));
        assert_eq!(it.vat_rate(), dec("23"));
        it.set_vat_rate_text("0,08", dec("23"));
        assert_eq!(it.vat_rate(), dec("8"));
    }

    #[test]
    fn test_display_name_and_blank_overrides() {
        let mut it = item("1");
        assert_eq!(it.display_name(), "Cable 3x2.5");

        it.set_custom_name(Some("Cable (black)".to_string()));
        assert_eq!(it.display_name(), "Cable (black)");

        it.set_custom_name(Some("   ".to_string()));
        assert_eq!(it.custom_name(), None);

        it.set_category_name(Some("".to_string()));
        assert_eq!(it.category_name(), None);
    }

    #[test]
    fn test_from_product_uses_category_margin() {
        let product = Product {
            id: 7,
            code: Some("K-7".to_string()),
            name: "Socket".to_string(),
            unit: String::new(),
            purchase_price_net: dec("12.40"),
            price_updated_at: None,
            vat_rate: dec("23"),
            category_id: 2,
        };
        let category = Category {
            id: 2,
            name: "Electrical".to_string(),
            default_margin: dec("30"),
            display_order: 1,
        };

        let it = OfferLineItem::from_product(&product, Some(&category), &ItemDefaults::default());
        assert_eq!(it.product_id(), Some(7));
        assert_eq!(it.unit(), DEFAULT_UNIT);

        let defaults = ItemDefaults {
            vat_rate: dec("8"),
            unit: "m".to_string(),
        };
        assert_eq!(OfferLineItem::from_product(&product, None, &defaults).unit(), "m");
        assert_eq!(it.category_name(), Some("Electrical"));
        assert_eq!(it.margin(), dec("30"));
        assert_eq!(it.sale_price_net(), dec("16.12"));
        assert_eq!(it.quantity(), Decimal::ONE);
    }

    #[test]
    fn test_saved_row_restores_item() {
        let mut it = item("55.5")
            .with_category("Tools")
            .with_margin(dec("18"))
            .with_quantity(dec("3"))
            .with_custom_name("Drill bits");
        it.set_selected(true);

        let row = it.to_saved(9);
        assert_eq!(row.offer_id, 9);
        let restored = OfferLineItem::from_saved(&row);

        assert_ne!(restored.instance_id(), it.instance_id());
        assert_eq!(restored.display_name(), "Drill bits");
        assert_eq!(restored.sale_price_net(), it.sale_price_net());
        assert_eq!(restored.total_gross(), it.total_gross());
        assert!(!restored.is_selected());
    }
}
