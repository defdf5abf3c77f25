//! Collaborator contracts consumed by the cart engine
//!
//! The order repository, printer path and add-on catalog live outside the
//! engine and are supplied through these traits.

use crate::orders::CartResult;
use async_trait::async_trait;
use futures::stream::BoxStream;
use shared::models::{AddOnItem, CatalogProduct};
use shared::order::{Order, OrderType};

/// Live snapshots of open orders
pub type OrderStream = BoxStream<'static, Vec<Order>>;

/// Source of open-order snapshots
pub trait OrderDataSource: Send + Sync {
    /// Stream of complete snapshots, optionally filtered by order type
    fn stream_open_orders(&self, order_type: Option<OrderType>) -> OrderStream;
}

/// Order-side effects (persistence, placing, printing)
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn place_order(&self, order_id: i64) -> CartResult<()>;

    /// Print one order; the printer accepts a single job at a time
    async fn print_order(&self, order_id: i64) -> CartResult<()>;

    async fn update_quantity(&self, order_id: i64, product_id: i64, delta: i32) -> CartResult<()>;

    async fn toggle_add_on(&self, order_id: i64, add_on_item_id: i64) -> CartResult<()>;

    /// Persist a catalog product newly added to an order
    async fn add_product(&self, order_id: i64, product: &CatalogProduct) -> CartResult<()> {
        self.update_quantity(order_id, product.id, 1).await
    }
}

/// Read-only add-on reference data
#[async_trait]
pub trait AddOnCatalog: Send + Sync {
    async fn list(&self) -> CartResult<Vec<AddOnItem>>;
}
