//! CartStore - snapshot of all open orders
//!
//! Holds the latest snapshot sorted by ascending `order_id`. A snapshot is
//! validated as a whole before it replaces the current one; an invalid
//! snapshot leaves the previous one in place.

use crate::orders::{CartError, CartResult};
use crate::pricing::PricingCalculator;
use shared::order::Order;
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default)]
pub struct CartStore {
    orders: Vec<Order>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole snapshot atomically
    pub fn load(&mut self, mut orders: Vec<Order>) -> CartResult<()> {
        validate_snapshot(&orders)?;
        orders.sort_by_key(|o| o.order_id);
        tracing::debug!(orders = orders.len(), "Cart snapshot loaded");
        self.orders = orders;
        Ok(())
    }

    pub fn get(&self, order_id: i64) -> Option<&Order> {
        self.index_of(order_id).map(|i| &self.orders[i])
    }

    /// Mutable access for the mutators of this crate
    pub(crate) fn get_mut(&mut self, order_id: i64) -> Option<&mut Order> {
        let idx = self.index_of(order_id)?;
        self.orders.get_mut(idx)
    }

    pub fn all_ids(&self) -> BTreeSet<i64> {
        self.orders.iter().map(|o| o.order_id).collect()
    }

    /// Orders in ascending id order
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn index_of(&self, order_id: i64) -> Option<usize> {
        self.orders
            .binary_search_by_key(&order_id, |o| o.order_id)
            .ok()
    }
}

fn validate_snapshot(orders: &[Order]) -> CartResult<()> {
    let mut order_ids = HashSet::with_capacity(orders.len());
    let mut cart_total: i64 = 0;
    for order in orders {
        if !order_ids.insert(order.order_id) {
            return Err(CartError::DuplicateOrder(order.order_id));
        }

        let total = PricingCalculator::total(order)?;
        cart_total = cart_total
            .checked_add(total)
            .ok_or_else(|| CartError::InvalidPrice {
                order_id: order.order_id,
                reason: "cart total overflows".to_string(),
            })?;

        let mut product_ids = HashSet::with_capacity(order.products.len());
        for line in &order.products {
            if !product_ids.insert(line.product_id) {
                return Err(CartError::validation(format!(
                    "duplicate product {} in order {}",
                    line.product_id, order.order_id
                )));
            }
            if line.quantity < 1 {
                return Err(CartError::validation(format!(
                    "product {} in order {} has quantity {}",
                    line.product_id, order.order_id, line.quantity
                )));
            }
            if line.unit_price < 0 {
                return Err(CartError::validation(format!(
                    "product {} in order {} has negative unit price",
                    line.product_id, order.order_id
                )));
            }
        }
    }
    Ok(())
}
