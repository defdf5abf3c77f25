//! CartEngine - the single write path over cart state
//!
//! Owns the [`CartStore`] and [`SelectionManager`]; every user intent goes
//! through one `&mut self` method, so a read-modify-write can never interleave
//! with another.
//!
//! # Mutation Flow
//!
//! ```text
//! increase/decrease/toggle_add_on
//!     ├─ 1. Apply to local snapshot (QuantityMutator / AddOnSelector)
//!     ├─ 2. Persist through OrderService (optimistic, failure only logged)
//!     └─ 3. Next snapshot from OrderDataSource reconciles
//! ```

use crate::batch::{BatchCoordinator, BatchProgress, BatchReport};
use crate::cart::{CartStore, SelectionManager};
use crate::orders::{AddOnSelector, AddOnToggle, CartResult, MutationOutcome, QuantityMutator};
use crate::pricing::CartSummary;
use crate::projection::{UiState, UiStateProjector};
use crate::services::OrderService;
use shared::models::{AddOnItem, CatalogProduct};
use shared::order::Order;
use std::sync::Arc;

pub struct CartEngine {
    store: CartStore,
    selection: SelectionManager,
    /// True until the first valid snapshot arrives
    loading: bool,
    /// Offerable add-ons (applicable only, by id)
    add_ons: Vec<AddOnItem>,
    service: Arc<dyn OrderService>,
    optimistic_sync: bool,
}

impl std::fmt::Debug for CartEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartEngine")
            .field("orders", &self.store.len())
            .field("selected", &self.selection.count())
            .field("loading", &self.loading)
            .field("service", &"<OrderService>")
            .finish()
    }
}

impl CartEngine {
    pub fn new(service: Arc<dyn OrderService>) -> Self {
        Self {
            store: CartStore::new(),
            selection: SelectionManager::new(),
            loading: true,
            add_ons: Vec::new(),
            service,
            optimistic_sync: true,
        }
    }

    pub fn with_optimistic_sync(mut self, enabled: bool) -> Self {
        self.optimistic_sync = enabled;
        self
    }

    // ========== Snapshot ==========

    /// Load a fresh snapshot and prune the selection to it
    ///
    /// Returns the ids dropped from the selection. A rejected snapshot keeps
    /// the previous state, including the loading flag.
    pub fn apply_snapshot(&mut self, orders: Vec<Order>) -> CartResult<Vec<i64>> {
        self.store.load(orders)?;
        self.loading = false;
        let valid_ids = self.store.all_ids();
        Ok(self.selection.prune(&valid_ids))
    }

    pub fn set_add_on_catalog(&mut self, catalog: &[AddOnItem]) {
        self.add_ons = AddOnSelector::available(catalog);
    }

    // ========== Quantity ==========

    /// Add one unit of a catalog product (inserting the line if needed)
    pub async fn increase(&mut self, order_id: i64, product: &CatalogProduct) -> CartResult<MutationOutcome> {
        let had_line = self
            .store
            .get(order_id)
            .is_some_and(|o| o.line(product.id).is_some());
        let outcome = QuantityMutator::increase(&mut self.store, order_id, product)?;
        tracing::debug!(order_id, product_id = product.id, ?outcome, "Quantity increased");

        if self.optimistic_sync {
            let result = if had_line {
                self.service.update_quantity(order_id, product.id, 1).await
            } else {
                self.service.add_product(order_id, product).await
            };
            log_sync_failure(result, order_id, "increase");
        }
        Ok(outcome)
    }

    /// Add one unit to an existing line
    pub async fn increase_line(&mut self, order_id: i64, product_id: i64) -> CartResult<MutationOutcome> {
        let outcome = QuantityMutator::increase_line(&mut self.store, order_id, product_id)?;
        tracing::debug!(order_id, product_id, ?outcome, "Quantity increased");

        if self.optimistic_sync {
            let result = self.service.update_quantity(order_id, product_id, 1).await;
            log_sync_failure(result, order_id, "increase");
        }
        Ok(outcome)
    }

    pub async fn decrease(&mut self, order_id: i64, product_id: i64) -> CartResult<MutationOutcome> {
        let was_empty = self.store.get(order_id).is_some_and(Order::is_empty);
        let outcome = QuantityMutator::decrease(&mut self.store, order_id, product_id)?;
        tracing::debug!(order_id, product_id, ?outcome, "Quantity decreased");

        if self.optimistic_sync && !was_empty {
            let result = self.service.update_quantity(order_id, product_id, -1).await;
            log_sync_failure(result, order_id, "decrease");
        }
        Ok(outcome)
    }

    // ========== Add-ons ==========

    pub async fn toggle_add_on(&mut self, order_id: i64, add_on_item_id: i64) -> CartResult<AddOnToggle> {
        let toggle = AddOnSelector::toggle(&mut self.store, order_id, add_on_item_id)?;
        tracing::debug!(order_id, add_on_item_id, ?toggle, "Add-on toggled");

        if self.optimistic_sync {
            let result = self.service.toggle_add_on(order_id, add_on_item_id).await;
            log_sync_failure(result, order_id, "toggle_add_on");
        }
        Ok(toggle)
    }

    // ========== Selection ==========

    pub fn toggle_select(&mut self, order_id: i64) -> CartResult<bool> {
        let visible = self.store.all_ids();
        self.selection.toggle_select(order_id, &visible)
    }

    pub fn select_all(&mut self) -> usize {
        let visible = self.store.all_ids();
        self.selection.select_all(&visible)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ========== Batch ==========

    /// Selected ids, or every visible id when nothing is selected
    pub fn batch_targets(&self) -> Vec<i64> {
        BatchCoordinator::targets(&self.selection, &self.store.all_ids())
    }

    pub async fn place_all<P>(&self, on_progress: P) -> BatchReport
    where
        P: FnMut(&BatchProgress),
    {
        BatchCoordinator::place_all(self.service.as_ref(), self.batch_targets(), on_progress).await
    }

    pub async fn print_all<P>(&self, on_progress: P) -> BatchReport
    where
        P: FnMut(&BatchProgress),
    {
        BatchCoordinator::print_all(self.service.as_ref(), self.batch_targets(), on_progress).await
    }

    // ========== Read side ==========

    pub fn ui_state(&self) -> UiState<Vec<Order>> {
        UiStateProjector::project(self.loading, self.store.orders().to_vec())
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::from_orders(self.store.orders(), self.selection.ids())
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn add_ons(&self) -> &[AddOnItem] {
        &self.add_ons
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

fn log_sync_failure(result: CartResult<()>, order_id: i64, op: &'static str) {
    if let Err(e) = result {
        tracing::warn!(order_id, op, error = %e, "Failed to persist cart change, awaiting next snapshot");
    }
}
