//! Custom category order for exports

use crate::grouping::{CategoryOrder, category_label};
use crate::offer::OfferLineItem;
use serde::{Deserialize, Serialize};
use shared::models::Category;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOrderEntry {
    pub name: String,
    /// 1-based position
    pub order: i32,
}

/// Ordered list of category names with a movable selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOrderList {
    entries: Vec<CategoryOrderEntry>,
    selected: Option<usize>,
}

impl CategoryOrderList {
    /// Build from names, dropping blanks and duplicates
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut seen = HashSet::new();
        let entries = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty() && seen.insert(n.to_string()))
            .enumerate()
            .map(|(index, name)| CategoryOrderEntry {
                name: name.to_string(),
                order: index as i32 + 1,
            })
            .collect();
        Self {
            entries,
            selected: None,
        }
    }

    /// Catalog categories by display order, then name
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut sorted: Vec<&Category> = categories.iter().collect();
        sorted.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        let names: Vec<&str> = sorted.iter().map(|c| c.name.as_str()).collect();
        Self::from_names(&names)
    }

    /// Categories present in the offer
    ///
    /// A saved order wins for the names it knows; remaining categories follow
    /// in order of first appearance.
    pub fn for_items(items: &[OfferLineItem], saved: Option<&[String]>) -> Self {
        let present: Vec<&str> = {
            let mut seen = HashSet::new();
            items
                .iter()
                .map(|i| category_label(i.category_name()))
                .filter(|label| seen.insert(*label))
                .collect()
        };
        let mut names: Vec<&str> = saved
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .filter(|name| present.contains(name))
            .collect();
        for label in present {
            if !names.contains(&label) {
                names.push(label);
            }
        }
        Self::from_names(&names)
    }

    pub fn entries(&self) -> &[CategoryOrderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn select(&mut self, name: &str) -> bool {
        self.selected = self.entries.iter().position(|e| e.name == name);
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.entries[i].name.as_str())
    }

    pub fn can_move_up(&self) -> bool {
        self.selected.is_some_and(|i| i > 0)
    }

    pub fn can_move_down(&self) -> bool {
        self.selected.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Move the selected category one place up; selection follows it
    pub fn move_up(&mut self) -> bool {
        if !self.can_move_up() {
            return false;
        }
        let Some(index) = self.selected else {
            return false;
        };
        self.entries.swap(index, index - 1);
        self.selected = Some(index - 1);
        self.renumber();
        true
    }

    pub fn move_down(&mut self) -> bool {
        if !self.can_move_down() {
            return false;
        }
        let Some(index) = self.selected else {
            return false;
        };
        self.entries.swap(index, index + 1);
        self.selected = Some(index + 1);
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.order = index as i32 + 1;
        }
    }

    pub fn ordered_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn to_category_order(&self) -> CategoryOrder {
        CategoryOrder::from_names(&self.ordered_names())
    }
}
