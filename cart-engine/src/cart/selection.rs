//! SelectionManager - which orders the user has ticked
//!
//! The selection is always a subset of the ids in the current snapshot:
//! every operation takes the live id set and [`SelectionManager::prune`]
//! runs on each snapshot load.

use crate::orders::{CartError, CartResult};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: BTreeSet<i64>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the order if absent, remove it if present
    ///
    /// Returns whether the order is selected afterwards.
    pub fn toggle_select(&mut self, order_id: i64, visible: &BTreeSet<i64>) -> CartResult<bool> {
        if self.selected.remove(&order_id) {
            return Ok(false);
        }
        if !visible.contains(&order_id) {
            return Err(CartError::OrderNotFound(order_id));
        }
        self.selected.insert(order_id);
        Ok(true)
    }

    /// Select every visible order, or clear when everything is already selected
    ///
    /// Returns the selection size afterwards.
    pub fn select_all(&mut self, visible: &BTreeSet<i64>) -> usize {
        if self.selected == *visible {
            self.selected.clear();
        } else {
            self.selected = visible.clone();
        }
        self.selected.len()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop ids that are no longer in `valid_ids`; returns the dropped ids
    pub fn prune(&mut self, valid_ids: &BTreeSet<i64>) -> Vec<i64> {
        let stale: Vec<i64> = self.selected.difference(valid_ids).copied().collect();
        for id in &stale {
            self.selected.remove(id);
        }
        if !stale.is_empty() {
            tracing::debug!(pruned = ?stale, "Pruned stale selection");
        }
        stale
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, order_id: i64) -> bool {
        self.selected.contains(&order_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected ids in ascending order
    pub fn ids(&self) -> &BTreeSet<i64> {
        &self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[i64]) -> BTreeSet<i64> {
        v.iter().copied().collect()
    }

    #[test]
    fn test_toggle_select() {
        let visible = ids(&[1, 2, 3]);
        let mut selection = SelectionManager::new();

        assert_eq!(selection.toggle_select(2, &visible), Ok(true));
        assert!(selection.is_selected(2));
        assert_eq!(selection.count(), 1);

        assert_eq!(selection.toggle_select(2, &visible), Ok(false));
        assert!(!selection.is_selected(2));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_unknown_order_is_not_found() {
        let mut selection = SelectionManager::new();
        let result = selection.toggle_select(9, &ids(&[1]));
        assert_eq!(result, Err(CartError::OrderNotFound(9)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_toggles() {
        let visible = ids(&[1, 2, 3]);
        let mut selection = SelectionManager::new();

        assert_eq!(selection.select_all(&visible), 3);
        assert_eq!(selection.ids(), &visible);

        assert_eq!(selection.select_all(&visible), 0);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_from_partial_selects_everything() {
        let visible = ids(&[1, 2, 3]);
        let mut selection = SelectionManager::new();
        selection.toggle_select(1, &visible).unwrap();

        assert_eq!(selection.select_all(&visible), 3);
        assert_eq!(selection.ids(), &visible);
    }

    #[test]
    fn test_prune_keeps_subset() {
        let mut selection = SelectionManager::new();
        selection.select_all(&ids(&[1, 2]));

        let pruned = selection.prune(&ids(&[2]));
        assert_eq!(pruned, vec![1]);
        assert_eq!(selection.ids(), &ids(&[2]));
    }

    #[test]
    fn test_clear() {
        let mut selection = SelectionManager::new();
        selection.select_all(&ids(&[4, 5]));
        selection.clear();
        assert_eq!(selection.count(), 0);
    }
}
