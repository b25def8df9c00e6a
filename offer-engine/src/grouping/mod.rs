//! Category grouping of offer items
//!
//! Items are bucketed by category label and the buckets ordered by the
//! catalog display order (unknown labels last), alphabetically for exports
//! without a custom order, or by first appearance for the reorder dialog.
//! Within a bucket items keep their offer order.
//!
//! [`GroupingCache`] regroups only when the editor's structural version
//! moves; value edits (margin, price, quantity) reuse the cached `Arc`.

use crate::offer::OfferLineItem;
use shared::models::{Category, UNRANKED_DISPLAY_ORDER};
use std::collections::HashMap;
use std::sync::Arc;

/// Label for items without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Group label for an optional category name
pub fn category_label(category_name: Option<&str>) -> &str {
    match category_name.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => UNCATEGORIZED,
    }
}

/// Anything that can be bucketed by category
pub trait Categorized {
    fn item_id(&self) -> &str;
    fn category_name(&self) -> Option<&str>;
}

impl Categorized for OfferLineItem {
    fn item_id(&self) -> &str {
        self.instance_id()
    }

    fn category_name(&self) -> Option<&str> {
        OfferLineItem::category_name(self)
    }
}

/// One category bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub label: String,
    /// Member instance ids, in offer order
    pub item_ids: Vec<String>,
    pub is_expanded: bool,
}

impl CategoryGroup {
    pub fn is_uncategorized(&self) -> bool {
        self.label == UNCATEGORIZED
    }

    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }
}

/// Display rank per category name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOrder {
    ranks: HashMap<String, i32>,
}

impl CategoryOrder {
    /// Ranks from catalog categories
    pub fn from_categories(categories: &[Category]) -> Self {
        Self {
            ranks: categories
                .iter()
                .map(|c| (c.name.clone(), c.display_order))
                .collect(),
        }
    }

    /// Ranks from an explicit name list, first name ranked 1
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut order = Self::default();
        for (index, name) in names.iter().enumerate() {
            order
                .ranks
                .entry(name.as_ref().to_string())
                .or_insert(index as i32 + 1);
        }
        order
    }

    pub fn insert(&mut self, name: impl Into<String>, rank: i32) {
        self.ranks.insert(name.into(), rank);
    }

    /// Rank of a label; unknown labels sort last
    pub fn rank(&self, label: &str) -> i32 {
        self.ranks
            .get(label)
            .copied()
            .unwrap_or(UNRANKED_DISPLAY_ORDER)
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// How groups are ordered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOrder {
    /// Catalog or custom display order
    DisplayOrder(CategoryOrder),
    /// Case-insensitive by label, uncategorized last
    Alphabetical,
    /// Order of first appearance in the item list
    FirstSeen,
}

impl Default for GroupOrder {
    fn default() -> Self {
        Self::DisplayOrder(CategoryOrder::default())
    }
}

/// Bucket items by category and order the buckets
///
/// Expand flags are looked up by label in `expanded`; labels seen for the
/// first time start expanded.
pub fn group_items<'a, T, I>(
    items: I,
    order: &GroupOrder,
    expanded: &HashMap<String, bool>,
) -> Vec<CategoryGroup>
where
    T: Categorized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut groups: Vec<CategoryGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let label = category_label(item.category_name());
        let slot = match index.get(label) {
            Some(slot) => *slot,
            None => {
                groups.push(CategoryGroup {
                    label: label.to_string(),
                    item_ids: Vec::new(),
                    is_expanded: expanded.get(label).copied().unwrap_or(true),
                });
                index.insert(label.to_string(), groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[slot].item_ids.push(item.item_id().to_string());
    }

    // stable: ties keep first-seen order
    match order {
        GroupOrder::DisplayOrder(ranks) => groups.sort_by_key(|g| ranks.rank(&g.label)),
        GroupOrder::Alphabetical => groups.sort_by_cached_key(|g| {
            (g.is_uncategorized(), g.label.to_lowercase())
        }),
        GroupOrder::FirstSeen => {}
    }
    groups
}

/// Grouping result cached against the editor's structural version
#[derive(Debug, Default)]
pub struct GroupingCache {
    cached: Option<Arc<Vec<CategoryGroup>>>,
    cached_version: u64,
    expanded: HashMap<String, bool>,
}

impl GroupingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached groups for `version`, regrouping only when the version moved
    pub fn groups<'a, T, I>(
        &mut self,
        version: u64,
        items: I,
        order: &GroupOrder,
    ) -> Arc<Vec<CategoryGroup>>
    where
        T: Categorized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        if let Some(cached) = &self.cached
            && self.cached_version == version
        {
            return Arc::clone(cached);
        }

        let groups = Arc::new(group_items(items, order, &self.expanded));
        tracing::debug!(version, groups = groups.len(), "Regrouped offer items");
        self.cached = Some(Arc::clone(&groups));
        self.cached_version = version;
        groups
    }

    /// Record the expand state of a group, kept across regroupings
    pub fn set_expanded(&mut self, label: &str, expanded: bool) {
        self.expanded.insert(label.to_string(), expanded);
        if let Some(cached) = self.cached.as_mut()
            && let Some(group) = Arc::make_mut(cached).iter_mut().find(|g| g.label == label)
        {
            group.is_expanded = expanded;
        }
    }

    pub fn is_expanded(&self, label: &str) -> bool {
        self.expanded.get(label).copied().unwrap_or(true)
    }

    /// Drop the cached result (group order changed)
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Version of the cached result, if any
    pub fn cached_version(&self) -> Option<u64> {
        self.cached.as_ref().map(|_| self.cached_version)
    }
}

#[cfg(test)]
mod tests;
