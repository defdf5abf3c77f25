//! In-memory order repository
//!
//! Implements every collaborator trait over a `watch` channel so the engine
//! can run without a database: placing an order drops it from the open set,
//! quantity/add-on updates are applied and re-emitted, prints are logged.
//! Failures can be injected per order for the place and print paths.
//!
//! Base price is recomputed on every change as line totals plus the prices of
//! the selected add-ons (discount is kept, capped at the new base).

use super::traits::{AddOnCatalog, OrderDataSource, OrderService, OrderStream};
use crate::orders::{CartError, CartResult};
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use shared::models::{AddOnItem, CatalogProduct};
use shared::order::{Order, OrderType, ProductLine};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// Service call as observed by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCall {
    Place(i64),
    Print(i64),
    UpdateQuantity {
        order_id: i64,
        product_id: i64,
        delta: i32,
    },
    ToggleAddOn {
        order_id: i64,
        add_on_item_id: i64,
    },
    AddProduct {
        order_id: i64,
        product_id: i64,
    },
}

#[derive(Debug, Default)]
struct Faults {
    place: HashSet<i64>,
    print: HashSet<i64>,
    updates: bool,
}

pub struct MemoryOrderStore {
    orders: watch::Sender<Vec<Order>>,
    add_ons: Mutex<Vec<AddOnItem>>,
    faults: Mutex<Faults>,
    calls: Mutex<Vec<ServiceCall>>,
    printed: Mutex<Vec<i64>>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryOrderStore {
    pub fn new(orders: Vec<Order>) -> Self {
        let (tx, _) = watch::channel(orders);
        Self {
            orders: tx,
            add_ons: Mutex::new(Vec::new()),
            faults: Mutex::new(Faults::default()),
            calls: Mutex::new(Vec::new()),
            printed: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_add_ons(self, items: Vec<AddOnItem>) -> Self {
        *self.add_ons.lock() = items;
        self
    }

    /// Simulated I/O time for place/print calls
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_place(&self, order_id: i64) {
        self.faults.lock().place.insert(order_id);
    }

    pub fn fail_print(&self, order_id: i64) {
        self.faults.lock().print.insert(order_id);
    }

    /// Make quantity/add-on persistence fail
    pub fn fail_updates(&self, fail: bool) {
        self.faults.lock().updates = fail;
    }

    /// Replace the open orders (upstream order creation)
    pub fn publish(&self, orders: Vec<Order>) {
        self.orders.send_replace(orders);
    }

    pub fn open_orders(&self) -> Vec<Order> {
        self.orders.borrow().clone()
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().clone()
    }

    pub fn printed(&self) -> Vec<i64> {
        self.printed.lock().clone()
    }

    /// Highest number of place/print calls observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    /// Apply `f` to one order and re-emit the snapshot if it exists
    fn modify_order(&self, order_id: i64, f: impl FnOnce(&mut Order)) -> CartResult<()> {
        let add_ons = self.add_ons.lock().clone();
        let mut found = false;
        self.orders.send_if_modified(|orders| {
            if let Some(order) = orders.iter_mut().find(|o| o.order_id == order_id) {
                f(order);
                reprice(order, &add_ons);
                found = true;
            }
            found
        });
        if found {
            Ok(())
        } else {
            Err(CartError::repository(format!("order {} is not open", order_id)))
        }
    }

    fn check_updates(&self) -> CartResult<()> {
        if self.faults.lock().updates {
            return Err(CartError::repository("database unavailable"));
        }
        Ok(())
    }
}

fn reprice(order: &mut Order, add_ons: &[AddOnItem]) {
    let lines = order
        .products
        .iter()
        .map(ProductLine::line_total)
        .fold(0_i64, i64::saturating_add);
    let extras = add_ons
        .iter()
        .filter(|a| order.add_on_item_ids.contains(&a.item_id))
        .map(|a| a.price)
        .fold(0_i64, i64::saturating_add);
    order.price.base_price = lines.saturating_add(extras);
    order.price.discount_price = order.price.discount_price.min(order.price.base_price);
}

impl OrderDataSource for MemoryOrderStore {
    fn stream_open_orders(&self, order_type: Option<OrderType>) -> OrderStream {
        let mut rx = self.orders.subscribe();
        rx.mark_changed();
        futures::stream::unfold(rx, |mut rx| async move {
            rx.changed().await.ok()?;
            let orders = rx.borrow_and_update().clone();
            Some((orders, rx))
        })
        .map(move |orders| match order_type {
            Some(t) => orders.into_iter().filter(|o| o.order_type == t).collect(),
            None => orders,
        })
        .boxed()
    }
}

#[async_trait]
impl OrderService for MemoryOrderStore {
    async fn place_order(&self, order_id: i64) -> CartResult<()> {
        self.calls.lock().push(ServiceCall::Place(order_id));
        self.enter().await;
        let result = if self.faults.lock().place.contains(&order_id) {
            Err(CartError::repository(format!("order {} rejected", order_id)))
        } else {
            let mut removed = false;
            self.orders.send_if_modified(|orders| {
                let before = orders.len();
                orders.retain(|o| o.order_id != order_id);
                removed = orders.len() != before;
                removed
            });
            if removed {
                Ok(())
            } else {
                Err(CartError::repository(format!("order {} is not open", order_id)))
            }
        };
        self.leave();
        result
    }

    async fn print_order(&self, order_id: i64) -> CartResult<()> {
        self.calls.lock().push(ServiceCall::Print(order_id));
        self.enter().await;
        let result = if self.faults.lock().print.contains(&order_id) {
            Err(CartError::printer("printer offline"))
        } else {
            self.printed.lock().push(order_id);
            Ok(())
        };
        self.leave();
        result
    }

    async fn update_quantity(&self, order_id: i64, product_id: i64, delta: i32) -> CartResult<()> {
        self.calls.lock().push(ServiceCall::UpdateQuantity {
            order_id,
            product_id,
            delta,
        });
        self.check_updates()?;
        self.modify_order(order_id, |order| {
            if let Some(idx) = order.products.iter().position(|p| p.product_id == product_id) {
                let quantity = order.products[idx].quantity.saturating_add(delta);
                if quantity < 1 {
                    order.products.remove(idx);
                } else {
                    order.products[idx].quantity = quantity;
                }
            }
        })
    }

    async fn toggle_add_on(&self, order_id: i64, add_on_item_id: i64) -> CartResult<()> {
        self.calls.lock().push(ServiceCall::ToggleAddOn {
            order_id,
            add_on_item_id,
        });
        self.check_updates()?;
        self.modify_order(order_id, |order| {
            if !order.add_on_item_ids.remove(&add_on_item_id) {
                order.add_on_item_ids.insert(add_on_item_id);
            }
        })
    }

    async fn add_product(&self, order_id: i64, product: &CatalogProduct) -> CartResult<()> {
        self.calls.lock().push(ServiceCall::AddProduct {
            order_id,
            product_id: product.id,
        });
        self.check_updates()?;
        self.modify_order(order_id, |order| match order.line_mut(product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => order
                .products
                .push(ProductLine::new(product.id, product.name.clone(), product.price, 1)),
        })
    }
}

#[async_trait]
impl AddOnCatalog for MemoryOrderStore {
    async fn list(&self) -> CartResult<Vec<AddOnItem>> {
        Ok(self.add_ons.lock().clone())
    }
}
