//! AddOnSelector
//!
//! Membership toggling of add-on items on one order. Prices are never touched
//! here: the base/discount pair is recomputed upstream and arrives with the
//! next snapshot.

use super::{CartError, CartResult};
use crate::cart::CartStore;
use serde::{Deserialize, Serialize};
use shared::models::AddOnItem;
use shared::order::Order;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOnToggle {
    Added,
    Removed,
}

pub struct AddOnSelector;

impl AddOnSelector {
    /// Remove the add-on if the order has it, add it otherwise
    pub fn toggle(store: &mut CartStore, order_id: i64, add_on_item_id: i64) -> CartResult<AddOnToggle> {
        let order = store
            .get_mut(order_id)
            .ok_or(CartError::OrderNotFound(order_id))?;

        if order.add_on_item_ids.remove(&add_on_item_id) {
            Ok(AddOnToggle::Removed)
        } else {
            order.add_on_item_ids.insert(add_on_item_id);
            Ok(AddOnToggle::Added)
        }
    }

    /// Items currently offerable, by ascending id
    pub fn available(catalog: &[AddOnItem]) -> Vec<AddOnItem> {
        let mut items: Vec<AddOnItem> = catalog.iter().filter(|i| i.is_applicable).cloned().collect();
        items.sort_by_key(|i| i.item_id);
        items
    }

    /// Resolve an order's add-on ids against the catalog; unknown ids are skipped
    pub fn selected<'a>(order: &Order, catalog: &'a [AddOnItem]) -> Vec<&'a AddOnItem> {
        order
            .add_on_item_ids
            .iter()
            .filter_map(|id| catalog.iter().find(|i| i.item_id == *id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderType, ProductLine};

    fn create_store() -> CartStore {
        let mut store = CartStore::new();
        store
            .load(vec![
                Order::new(1, OrderType::DineIn)
                    .with_product(ProductLine::new(10, "Tea", 50, 1))
                    .with_price(50, 0),
            ])
            .unwrap();
        store
    }

    fn add_on(item_id: i64, name: &str, is_applicable: bool) -> AddOnItem {
        AddOnItem {
            item_id,
            name: name.to_string(),
            price: 20,
            is_applicable,
        }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut store = create_store();

        assert_eq!(AddOnSelector::toggle(&mut store, 1, 7), Ok(AddOnToggle::Added));
        assert!(store.get(1).unwrap().add_on_item_ids.contains(&7));

        assert_eq!(AddOnSelector::toggle(&mut store, 1, 7), Ok(AddOnToggle::Removed));
        assert!(store.get(1).unwrap().add_on_item_ids.is_empty());
    }

    #[test]
    fn test_toggle_leaves_price_untouched() {
        let mut store = create_store();
        let before = store.get(1).unwrap().price;
        AddOnSelector::toggle(&mut store, 1, 7).unwrap();
        assert_eq!(store.get(1).unwrap().price, before);
    }

    #[test]
    fn test_toggle_unknown_order() {
        let mut store = create_store();
        assert_eq!(
            AddOnSelector::toggle(&mut store, 5, 7),
            Err(CartError::OrderNotFound(5))
        );
    }

    #[test]
    fn test_available_filters_and_sorts() {
        let catalog = vec![
            add_on(3, "Fries", true),
            add_on(1, "Salad", true),
            add_on(2, "Soup", false),
        ];
        let ids: Vec<i64> = AddOnSelector::available(&catalog)
            .iter()
            .map(|i| i.item_id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_selected_skips_unknown_ids() {
        let mut store = create_store();
        AddOnSelector::toggle(&mut store, 1, 1).unwrap();
        AddOnSelector::toggle(&mut store, 1, 42).unwrap();

        let catalog = vec![add_on(1, "Salad", true)];
        let selected = AddOnSelector::selected(store.get(1).unwrap(), &catalog);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Salad");
    }
}
