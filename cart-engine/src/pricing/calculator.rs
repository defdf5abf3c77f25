//! Price Calculator
//!
//! Displayable order totals derived from the upstream price pair.
//! Prices are integers in minor currency units; nothing is rounded or clamped.

use crate::orders::{CartError, CartResult};
use shared::order::{Order, OrderPrice};

/// Derives displayable totals from an order's base/discount price pair
pub struct PricingCalculator;

impl PricingCalculator {
    /// Check `0 <= discount_price <= base_price`
    pub fn validate(price: &OrderPrice) -> CartResult<()> {
        if price.base_price < 0 {
            return Err(CartError::validation(format!(
                "base price must be non-negative, got {}",
                price.base_price
            )));
        }
        if price.discount_price < 0 {
            return Err(CartError::validation(format!(
                "discount price must be non-negative, got {}",
                price.discount_price
            )));
        }
        if price.discount_price > price.base_price {
            return Err(CartError::validation(format!(
                "discount price {} exceeds base price {}",
                price.discount_price, price.base_price
            )));
        }
        Ok(())
    }

    /// `base_price - discount_price`
    ///
    /// An order violating the price invariant is reported, never clamped.
    pub fn total(order: &Order) -> CartResult<i64> {
        Self::validate(&order.price).map_err(|e| match e {
            CartError::Validation(reason) => CartError::InvalidPrice {
                order_id: order.order_id,
                reason,
            },
            other => other,
        })?;
        Ok(order.price.base_price - order.price.discount_price)
    }
}
