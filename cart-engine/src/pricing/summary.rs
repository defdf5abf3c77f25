//! Cart-wide totals and counts

use super::PricingCalculator;
use serde::{Deserialize, Serialize};
use shared::order::Order;
use std::collections::BTreeSet;

/// Aggregated totals for the current snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub order_count: usize,
    /// Sum of line quantities across all orders
    pub item_count: i64,
    /// Sum of order totals (valid orders only, saturating at `i64::MAX`)
    pub grand_total: i64,
    pub selected_count: usize,
    pub selected_total: i64,
    /// Orders whose price pair failed validation (excluded from totals)
    pub invalid_orders: usize,
}

impl CartSummary {
    pub fn from_orders(orders: &[Order], selected: &BTreeSet<i64>) -> Self {
        let mut summary = Self {
            order_count: orders.len(),
            ..Self::default()
        };

        for order in orders {
            summary.item_count = summary.item_count.saturating_add(order.item_count());
            let is_selected = selected.contains(&order.order_id);
            if is_selected {
                summary.selected_count += 1;
            }

            match PricingCalculator::total(order) {
                Ok(total) => {
                    summary.grand_total = summary.grand_total.saturating_add(total);
                    if is_selected {
                        summary.selected_total = summary.selected_total.saturating_add(total);
                    }
                }
                Err(e) => {
                    tracing::warn!(order_id = order.order_id, error = %e, "Order excluded from totals");
                    summary.invalid_orders += 1;
                }
            }
        }

        summary
    }
}
