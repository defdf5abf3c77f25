//! QuantityMutator
//!
//! Increment / decrement of a single product line within one order.
//! A line reaching quantity 0 is removed, never kept at 0. Removing the last
//! line reports [`MutationOutcome::OrderEmptied`], and so does every further
//! decrement until the repository drops the order.

use super::{CartError, CartResult};
use crate::cart::CartStore;
use serde::{Deserialize, Serialize};
use shared::models::CatalogProduct;
use shared::order::ProductLine;

/// Result of a successful quantity change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// Line quantity changed (or the line was inserted with quantity 1)
    Updated {
        order_id: i64,
        product_id: i64,
        quantity: i32,
    },
    /// Line removed; the order still has other lines
    LineRemoved { order_id: i64, product_id: i64 },
    /// Last line removed; the order has no products left
    OrderEmptied { order_id: i64 },
}

pub struct QuantityMutator;

impl QuantityMutator {
    /// Add one unit of `product`, inserting a new line if the order lacks it
    pub fn increase(
        store: &mut CartStore,
        order_id: i64,
        product: &CatalogProduct,
    ) -> CartResult<MutationOutcome> {
        let order = store
            .get_mut(order_id)
            .ok_or(CartError::OrderNotFound(order_id))?;

        if let Some(line) = order.line_mut(product.id) {
            line.quantity = increment(line.quantity, order_id, product.id)?;
            return Ok(MutationOutcome::Updated {
                order_id,
                product_id: product.id,
                quantity: line.quantity,
            });
        }

        if product.price < 0 {
            return Err(CartError::validation(format!(
                "product {} has negative price",
                product.id
            )));
        }
        order
            .products
            .push(ProductLine::new(product.id, product.name.clone(), product.price, 1));
        Ok(MutationOutcome::Updated {
            order_id,
            product_id: product.id,
            quantity: 1,
        })
    }

    /// Add one unit to an existing line
    pub fn increase_line(
        store: &mut CartStore,
        order_id: i64,
        product_id: i64,
    ) -> CartResult<MutationOutcome> {
        let order = store
            .get_mut(order_id)
            .ok_or(CartError::OrderNotFound(order_id))?;
        let line = order
            .line_mut(product_id)
            .ok_or(CartError::ProductNotFound {
                order_id,
                product_id,
            })?;

        line.quantity = increment(line.quantity, order_id, product_id)?;
        Ok(MutationOutcome::Updated {
            order_id,
            product_id,
            quantity: line.quantity,
        })
    }

    /// Remove one unit; a line reaching 0 is deleted
    pub fn decrease(
        store: &mut CartStore,
        order_id: i64,
        product_id: i64,
    ) -> CartResult<MutationOutcome> {
        let order = store
            .get_mut(order_id)
            .ok_or(CartError::OrderNotFound(order_id))?;
        if order.products.is_empty() {
            return Ok(MutationOutcome::OrderEmptied { order_id });
        }
        let idx = order
            .products
            .iter()
            .position(|p| p.product_id == product_id)
            .ok_or(CartError::ProductNotFound {
                order_id,
                product_id,
            })?;

        let line = &mut order.products[idx];
        if line.quantity > 1 {
            line.quantity -= 1;
            return Ok(MutationOutcome::Updated {
                order_id,
                product_id,
                quantity: line.quantity,
            });
        }

        order.products.remove(idx);
        if order.products.is_empty() {
            Ok(MutationOutcome::OrderEmptied { order_id })
        } else {
            Ok(MutationOutcome::LineRemoved {
                order_id,
                product_id,
            })
        }
    }
}

fn increment(quantity: i32, order_id: i64, product_id: i64) -> CartResult<i32> {
    quantity.checked_add(1).ok_or_else(|| {
        CartError::validation(format!(
            "quantity overflow for product {} in order {}",
            product_id, order_id
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{Order, OrderType};

    fn tea() -> CatalogProduct {
        CatalogProduct::new(10, "Tea", 50)
    }

    fn coffee() -> CatalogProduct {
        CatalogProduct::new(20, "Coffee", 80)
    }

    fn create_store() -> CartStore {
        let mut store = CartStore::new();
        store
            .load(vec![
                Order::new(1, OrderType::DineIn)
                    .with_product(ProductLine::new(10, "Tea", 50, 2))
                    .with_price(100, 0),
                Order::new(2, OrderType::DineOut)
                    .with_product(ProductLine::new(20, "Coffee", 80, 1))
                    .with_price(80, 10),
            ])
            .unwrap();
        store
    }

    fn quantity(store: &CartStore, order_id: i64, product_id: i64) -> Option<i32> {
        store
            .get(order_id)
            .and_then(|o| o.line(product_id))
            .map(|l| l.quantity)
    }

    #[test]
    fn test_increase_existing_line() {
        let mut store = create_store();
        let outcome = QuantityMutator::increase(&mut store, 1, &tea()).unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::Updated {
                order_id: 1,
                product_id: 10,
                quantity: 3
            }
        );
        assert_eq!(quantity(&store, 1, 10), Some(3));
    }

    #[test]
    fn test_increase_inserts_missing_product() {
        let mut store = create_store();
        QuantityMutator::increase(&mut store, 1, &coffee()).unwrap();

        let order = store.get(1).unwrap();
        assert_eq!(order.products.len(), 2);
        let line = order.line(20).unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.product_name, "Coffee");
        assert_eq!(line.unit_price, 80);
    }

    #[test]
    fn test_increase_line_requires_existing_line() {
        let mut store = create_store();
        assert_eq!(
            QuantityMutator::increase_line(&mut store, 1, 20),
            Err(CartError::ProductNotFound {
                order_id: 1,
                product_id: 20
            })
        );
        assert!(QuantityMutator::increase_line(&mut store, 1, 10).is_ok());
        assert_eq!(quantity(&store, 1, 10), Some(3));
    }

    #[test]
    fn test_decrease_to_zero_removes_line() {
        let mut store = create_store();
        QuantityMutator::increase(&mut store, 1, &coffee()).unwrap();

        let outcome = QuantityMutator::decrease(&mut store, 1, 20).unwrap();
        assert_eq!(
            outcome,
            MutationOutcome::LineRemoved {
                order_id: 1,
                product_id: 20
            }
        );
        assert!(store.get(1).unwrap().line(20).is_none());
    }

    #[test]
    fn test_decrease_last_line_reports_emptied() {
        let mut store = create_store();
        let outcome = QuantityMutator::decrease(&mut store, 2, 20).unwrap();
        assert_eq!(outcome, MutationOutcome::OrderEmptied { order_id: 2 });

        // The order stays in the store; deleting it is the repository's call
        let order = store.get(2).unwrap();
        assert!(order.products.is_empty());

        // Still empty on the next decrement
        assert_eq!(
            QuantityMutator::decrease(&mut store, 2, 20),
            Ok(MutationOutcome::OrderEmptied { order_id: 2 })
        );
    }

    #[test]
    fn test_quantities_never_reach_zero() {
        let mut store = create_store();
        for _ in 0..5 {
            let _ = QuantityMutator::decrease(&mut store, 1, 10);
            for order in store.orders() {
                assert!(order.products.iter().all(|p| p.quantity >= 1));
            }
        }
        assert!(store.get(1).unwrap().products.is_empty());
    }

    #[test]
    fn test_decrease_unknown_product_is_not_found() {
        let mut store = create_store();
        assert_eq!(
            QuantityMutator::decrease(&mut store, 1, 99),
            Err(CartError::ProductNotFound {
                order_id: 1,
                product_id: 99
            })
        );
        assert_eq!(store.get(1).unwrap().line(10).unwrap().quantity, 2);
    }

    #[test]
    fn test_unknown_order_is_not_found() {
        let mut store = create_store();
        assert_eq!(
            QuantityMutator::increase(&mut store, 99, &tea()),
            Err(CartError::OrderNotFound(99))
        );
        assert_eq!(
            QuantityMutator::decrease(&mut store, 99, 10),
            Err(CartError::OrderNotFound(99))
        );
    }
}
