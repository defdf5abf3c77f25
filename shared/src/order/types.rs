//! Shared types for open orders

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Order Type
// ============================================================================

/// Order fulfillment mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// 堂食
    #[default]
    DineIn,
    /// 外卖 - carries customer address/phone for delivery
    DineOut,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::DineOut => "dine_out",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dine_in" | "dinein" => Ok(OrderType::DineIn),
            "dine_out" | "dineout" => Ok(OrderType::DineOut),
            other => Err(format!("Unknown order type: {}", other)),
        }
    }
}

// ============================================================================
// Product Line
// ============================================================================

/// One product within an order
///
/// A line never exists with `quantity < 1`; decrementing to zero removes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductLine {
    /// Product ID (unique within an order)
    pub product_id: i64,
    /// Product name snapshot
    pub product_name: String,
    /// Unit price in minor currency units
    pub unit_price: i64,
    pub quantity: i32,
}

impl ProductLine {
    pub fn new(product_id: i64, product_name: impl Into<String>, unit_price: i64, quantity: i32) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            unit_price,
            quantity,
        }
    }

    /// unit_price * quantity, saturating at `i64::MAX`
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }
}

// ============================================================================
// Price
// ============================================================================

/// Price pair computed upstream from the product lines and add-on state
///
/// Invariant: `0 <= discount_price <= base_price`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OrderPrice {
    pub base_price: i64,
    pub discount_price: i64,
}

impl OrderPrice {
    pub fn new(base_price: i64, discount_price: i64) -> Self {
        Self {
            base_price,
            discount_price,
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// Open order as held in the cart snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    /// Order ID (unique, stable for the order's lifetime)
    pub order_id: i64,
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    /// Product lines in insertion order
    pub products: Vec<ProductLine>,
    /// Selected add-on item IDs
    #[serde(default)]
    pub add_on_item_ids: BTreeSet<i64>,
    pub price: OrderPrice,
}

impl Order {
    /// Create an empty order of the given type
    pub fn new(order_id: i64, order_type: OrderType) -> Self {
        Self {
            order_id,
            order_type,
            customer_address: None,
            customer_phone: None,
            products: Vec::new(),
            add_on_item_ids: BTreeSet::new(),
            price: OrderPrice::default(),
        }
    }

    pub fn with_product(mut self, line: ProductLine) -> Self {
        self.products.push(line);
        self
    }

    pub fn with_price(mut self, base_price: i64, discount_price: i64) -> Self {
        self.price = OrderPrice::new(base_price, discount_price);
        self
    }

    pub fn with_customer(mut self, address: impl Into<String>, phone: impl Into<String>) -> Self {
        self.customer_address = Some(address.into());
        self.customer_phone = Some(phone.into());
        self
    }

    pub fn line(&self, product_id: i64) -> Option<&ProductLine> {
        self.products.iter().find(|p| p.product_id == product_id)
    }

    pub fn line_mut(&mut self, product_id: i64) -> Option<&mut ProductLine> {
        self.products.iter_mut().find(|p| p.product_id == product_id)
    }

    /// Sum of all line quantities
    pub fn item_count(&self) -> i64 {
        self.products.iter().map(|p| i64::from(p.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
