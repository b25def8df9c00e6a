//! Reorder dialog model
//!
//! A [`ReorderSession`] works on a copy of the offer's item order. Moves and
//! sorts only touch the working list; [`ReorderSession::apply`] hands the
//! final order to the editor in one step and [`ReorderSession::cancel`]
//! drops it. The live offer can keep changing while a session is open.
//!
//! Item moves always act on the flat working list; the grouped view is
//! rebuilt from it in first-seen order. Whole categories move only in the
//! grouped view.

pub mod category_order;

pub use category_order::CategoryOrderList;

use crate::grouping::{Categorized, CategoryGroup, GroupOrder, UNCATEGORIZED, category_label, group_items};
use crate::offer::{OfferEditor, OfferLineItem};
use std::collections::HashMap;

/// Snapshot of one item as seen by the reorder dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderEntry {
    pub instance_id: String,
    pub display_name: String,
    pub category_name: Option<String>,
}

impl ReorderEntry {
    pub fn from_item(item: &OfferLineItem) -> Self {
        Self {
            instance_id: item.instance_id().to_string(),
            display_name: item.display_name().to_string(),
            category_name: item.category_name().map(str::to_string),
        }
    }

    pub fn label(&self) -> &str {
        category_label(self.category_name.as_deref())
    }
}

impl Categorized for ReorderEntry {
    fn item_id(&self) -> &str {
        &self.instance_id
    }

    fn category_name(&self) -> Option<&str> {
        self.category_name.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grouped,
    Flat,
}

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: usize, to: usize },
    /// Already first/last, nothing changed
    AtBoundary,
    NotFound,
    /// Category moves need the grouped view
    NotGrouped,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Result of applying a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Order written back; `placed` items came from the session
    Applied { placed: usize },
    /// Working order equals the original, nothing written
    Unchanged,
    /// Session had no items
    Empty,
}

#[derive(Debug, Clone)]
pub struct ReorderSession {
    working: Vec<ReorderEntry>,
    original: Vec<ReorderEntry>,
    mode: ViewMode,
    expanded: HashMap<String, bool>,
    selected_item: Option<String>,
    selected_group: Option<String>,
    status: String,
}

impl ReorderSession {
    /// Snapshot the current order
    pub fn begin(items: &[OfferLineItem]) -> Self {
        let working: Vec<ReorderEntry> = items.iter().map(ReorderEntry::from_item).collect();
        let status = format!("{} items to arrange", working.len());
        Self {
            original: working.clone(),
            working,
            mode: ViewMode::default(),
            expanded: HashMap::new(),
            selected_item: None,
            selected_group: None,
            status,
        }
    }

    pub fn entries(&self) -> &[ReorderEntry] {
        &self.working
    }

    pub fn order(&self) -> Vec<String> {
        self.working.iter().map(|e| e.instance_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.working != self.original
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.status = match mode {
            ViewMode::Grouped => "Grouped view: move categories or items".to_string(),
            ViewMode::Flat => "Flat view: move any item".to_string(),
        };
    }

    /// Buckets in working order (first appearance)
    pub fn groups(&self) -> Vec<CategoryGroup> {
        group_items(&self.working, &GroupOrder::FirstSeen, &self.expanded)
    }

    pub fn set_group_expanded(&mut self, label: &str, expanded: bool) {
        self.expanded.insert(label.to_string(), expanded);
    }

    // ========== Selection ==========

    pub fn select_item(&mut self, instance_id: &str) -> bool {
        if self.index_of(instance_id).is_none() {
            return false;
        }
        self.selected_item = Some(instance_id.to_string());
        true
    }

    pub fn select_group(&mut self, label: &str) -> bool {
        if !self.working.iter().any(|e| e.label() == label) {
            return false;
        }
        self.selected_group = Some(label.to_string());
        true
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.selected_item.as_deref()
    }

    pub fn selected_group(&self) -> Option<&str> {
        self.selected_group.as_deref()
    }

    /// Current position of the selected item
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_item.as_deref().and_then(|id| self.index_of(id))
    }

    /// Current position of the selected group among the buckets
    pub fn selected_group_index(&self) -> Option<usize> {
        let label = self.selected_group.as_deref()?;
        self.groups().iter().position(|g| g.label == label)
    }

    fn index_of(&self, instance_id: &str) -> Option<usize> {
        self.working.iter().position(|e| e.instance_id == instance_id)
    }

    // ========== Item moves ==========

    /// Move an item one step or to an end of the working list
    ///
    /// The moved item becomes the selected item.
    pub fn move_item(&mut self, instance_id: &str, direction: MoveDirection) -> MoveOutcome {
        let Some(from) = self.index_of(instance_id) else {
            return MoveOutcome::NotFound;
        };
        let last = self.working.len() - 1;
        let to = match direction {
            MoveDirection::Up | MoveDirection::Top if from == 0 => None,
            MoveDirection::Down | MoveDirection::Bottom if from == last => None,
            MoveDirection::Up => Some(from - 1),
            MoveDirection::Down => Some(from + 1),
            MoveDirection::Top => Some(0),
            MoveDirection::Bottom => Some(last),
        };
        let Some(to) = to else {
            self.status = "Item is already at the edge".to_string();
            return MoveOutcome::AtBoundary;
        };

        let outcome = self.relocate(from, to);
        self.selected_item = Some(instance_id.to_string());
        let name = &self.working[to].display_name;
        self.status = match direction {
            MoveDirection::Up => format!("Moved up: {name}"),
            MoveDirection::Down => format!("Moved down: {name}"),
            MoveDirection::Top => format!("Moved to top: {name}"),
            MoveDirection::Bottom => format!("Moved to bottom: {name}"),
        };
        outcome
    }

    /// Move an item to an index of the working list; out-of-range targets
    /// are clamped
    pub fn move_item_to(&mut self, instance_id: &str, index: usize) -> MoveOutcome {
        let Some(from) = self.index_of(instance_id) else {
            return MoveOutcome::NotFound;
        };
        let to = index.min(self.working.len() - 1);
        if to == from {
            return MoveOutcome::AtBoundary;
        }
        let outcome = self.relocate(from, to);
        self.selected_item = Some(instance_id.to_string());
        self.status = format!("Moved: {}", self.working[to].display_name);
        outcome
    }

    fn relocate(&mut self, from: usize, to: usize) -> MoveOutcome {
        let entry = self.working.remove(from);
        self.working.insert(to, entry);
        MoveOutcome::Moved { from, to }
    }

    // ========== Category moves ==========

    /// Swap a category bucket with its neighbour
    ///
    /// The working list is rebuilt as the concatenation of buckets; order
    /// inside each bucket is unchanged. The moved category becomes the
    /// selected group.
    pub fn move_category(&mut self, label: &str, direction: MoveDirection) -> MoveOutcome {
        if self.mode != ViewMode::Grouped {
            return MoveOutcome::NotGrouped;
        }
        let groups = self.groups();
        let Some(from) = groups.iter().position(|g| g.label == label) else {
            return MoveOutcome::NotFound;
        };
        let last = groups.len() - 1;
        let to = match direction {
            MoveDirection::Up | MoveDirection::Top if from == 0 => None,
            MoveDirection::Down | MoveDirection::Bottom if from == last => None,
            MoveDirection::Up => Some(from - 1),
            MoveDirection::Down => Some(from + 1),
            MoveDirection::Top => Some(0),
            MoveDirection::Bottom => Some(last),
        };
        let Some(to) = to else {
            self.status = "Category is already at the edge".to_string();
            return MoveOutcome::AtBoundary;
        };

        let mut labels: Vec<String> = groups.into_iter().map(|g| g.label).collect();
        let moved = labels.remove(from);
        labels.insert(to, moved);
        self.rebuild_from_labels(&labels);

        self.selected_group = Some(label.to_string());
        self.status = format!("Category moved: {label}");
        MoveOutcome::Moved { from, to }
    }

    fn rebuild_from_labels(&mut self, labels: &[String]) {
        let mut buckets: HashMap<String, Vec<ReorderEntry>> = HashMap::new();
        for entry in self.working.drain(..) {
            buckets.entry(entry.label().to_string()).or_default().push(entry);
        }
        for label in labels {
            if let Some(bucket) = buckets.remove(label) {
                self.working.extend(bucket);
            }
        }
    }

    // ========== Sorting ==========

    /// Case-insensitive sort by display name
    pub fn sort_alphabetically(&mut self) {
        self.working
            .sort_by_cached_key(|e| e.display_name.to_lowercase());
        self.status = "Sorted alphabetically".to_string();
    }

    /// Sort by category, then display name; uncategorized items last
    pub fn sort_by_category_then_name(&mut self) {
        self.working.sort_by_cached_key(|e| {
            let label = e.label();
            (
                label == UNCATEGORIZED,
                label.to_lowercase(),
                e.display_name.to_lowercase(),
            )
        });
        self.status = "Sorted by category".to_string();
    }

    /// Restore the order the session started with
    pub fn reset_to_original(&mut self) {
        self.working = self.original.clone();
        self.status = "Original order restored".to_string();
    }

    // ========== Finish ==========

    /// Drop the working order; the live offer is untouched
    pub fn cancel(self) {
        tracing::debug!(items = self.working.len(), "Reorder session cancelled");
    }

    /// Write the working order back to the editor in one step
    pub fn apply(self, editor: &mut OfferEditor) -> ApplyOutcome {
        if self.working.is_empty() {
            tracing::warn!("Reorder session applied with no items");
            return ApplyOutcome::Empty;
        }
        if !self.has_changes() {
            return ApplyOutcome::Unchanged;
        }
        let placed = editor.replace_order(&self.order());
        ApplyOutcome::Applied { placed }
    }
}
