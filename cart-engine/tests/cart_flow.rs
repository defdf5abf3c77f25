use cart_engine::{
    BatchAction, CartHandle, CartIntent, CartNotice, CartView, CartWorker, EngineConfig, MemoryOrderStore,
    PricingCalculator, ServiceCall, UiState,
};
use shared::error::ErrorCode;
use shared::models::{AddOnItem, CatalogProduct};
use shared::order::{Order, OrderType, ProductLine};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

const TEA: i64 = 10;
const COFFEE: i64 = 20;

fn seed() -> Vec<Order> {
    vec![
        Order::new(1, OrderType::DineIn)
            .with_product(ProductLine::new(TEA, "Tea", 50, 2))
            .with_price(100, 0),
        Order::new(2, OrderType::DineOut)
            .with_customer("Calle Mayor 1", "600000000")
            .with_product(ProductLine::new(COFFEE, "Coffee", 80, 1))
            .with_price(80, 10),
    ]
}

struct Harness {
    store: Arc<MemoryOrderStore>,
    handle: CartHandle,
    view_rx: watch::Receiver<CartView>,
    shutdown: CancellationToken,
}

impl Harness {
    async fn start(store: MemoryOrderStore) -> Self {
        let store = Arc::new(store);
        let (worker, handle, mut view_rx) = CartWorker::new(
            &EngineConfig::default(),
            store.clone(),
            store.clone(),
            store.clone(),
        );
        let shutdown = CancellationToken::new();
        tokio::spawn(worker.run(shutdown.clone()));
        view_rx.wait_for(|v| !v.state.is_loading()).await.unwrap();
        Self {
            store,
            handle,
            view_rx,
            shutdown,
        }
    }

    async fn wait_for(&mut self, f: impl FnMut(&CartView) -> bool) -> CartView {
        tokio::time::timeout(Duration::from_secs(5), self.view_rx.wait_for(f))
            .await
            .expect("view condition not reached")
            .unwrap()
            .clone()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn quantity(view: &CartView, order_id: i64, product_id: i64) -> Option<i32> {
    view.state
        .data()?
        .iter()
        .find(|o| o.order_id == order_id)?
        .line(product_id)
        .map(|l| l.quantity)
}

#[tokio::test]
async fn test_tea_and_coffee_walkthrough() {
    let mut h = Harness::start(MemoryOrderStore::new(seed())).await;

    let view = h.wait_for(|v| v.summary.order_count == 2).await;
    let totals: Vec<i64> = view
        .state
        .data()
        .unwrap()
        .iter()
        .map(|o| PricingCalculator::total(o).unwrap())
        .collect();
    assert_eq!(totals, vec![100, 70]);

    h.handle
        .increase(1, CatalogProduct::new(TEA, "Tea", 50))
        .await
        .unwrap();
    h.wait_for(|v| quantity(v, 1, TEA) == Some(3)).await;

    h.handle.decrease(2, COFFEE).await.unwrap();
    h.handle.decrease(2, COFFEE).await.unwrap();
    let view = h
        .wait_for(|v| v.notice == Some(CartNotice::OrderEmptied { order_id: 2 }))
        .await;
    assert_eq!(quantity(&view, 2, COFFEE), None);

    // The backend saw one decrement only; the second hit an already empty order
    let decrements = h
        .store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ServiceCall::UpdateQuantity { delta: -1, .. }))
        .count();
    assert_eq!(decrements, 1);
}

#[tokio::test]
async fn test_select_all_toggles() {
    let mut h = Harness::start(MemoryOrderStore::new(seed())).await;

    h.handle.select_all().await.unwrap();
    let view = h.wait_for(|v| v.selected.len() == 2).await;
    assert_eq!(view.summary.selected_count, 2);
    assert_eq!(view.summary.selected_total, 170);

    h.handle.select_all().await.unwrap();
    h.wait_for(|v| v.selected.is_empty()).await;

    h.handle.toggle_select(2).await.unwrap();
    h.handle.select_all().await.unwrap();
    h.wait_for(|v| v.selected.len() == 2).await;
}

#[tokio::test]
async fn test_reload_prunes_selection() {
    let mut h = Harness::start(MemoryOrderStore::new(seed())).await;

    h.handle.select_all().await.unwrap();
    h.wait_for(|v| v.selected.len() == 2).await;

    h.store.publish(vec![seed().remove(0)]);
    let view = h.wait_for(|v| v.summary.order_count == 1).await;
    assert_eq!(view.selected, BTreeSet::from([1]));
}

#[tokio::test]
async fn test_invalid_snapshot_is_rejected() {
    let mut h = Harness::start(MemoryOrderStore::new(seed())).await;

    h.store
        .publish(vec![Order::new(7, OrderType::DineIn).with_price(10, 20)]);
    let view = h
        .wait_for(|v| matches!(v.notice, Some(CartNotice::SnapshotRejected { .. })))
        .await;
    assert_eq!(view.summary.order_count, 2);
    assert!(matches!(
        view.notice,
        Some(CartNotice::SnapshotRejected { code: ErrorCode::InvalidPrice, .. })
    ));
}

#[tokio::test]
async fn test_place_all_partial_failure() {
    let store = MemoryOrderStore::new(seed());
    store.fail_place(1);
    let mut h = Harness::start(store).await;

    h.handle.select_all().await.unwrap();
    h.wait_for(|v| v.selected.len() == 2).await;

    let report = h.handle.place_all().await.unwrap();
    assert_eq!(report.action, BatchAction::Place);
    assert_eq!(report.succeeded, vec![2]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 1);
    assert!(report.failed[0].1.starts_with("Place order failed"));
    assert_eq!(report.summary(), "1 of 2 orders failed");
    assert_eq!(h.store.calls(), vec![ServiceCall::Place(1), ServiceCall::Place(2)]);

    // Placed order leaves the open set and the selection; the failed one stays
    let view = h.wait_for(|v| v.summary.order_count == 1).await;
    assert_eq!(view.selected, BTreeSet::from([1]));
    assert_eq!(view.last_report.as_ref().map(|r| r.batch_id), Some(report.batch_id));
    assert!(view.batch.is_none());
    assert!(matches!(
        view.notice,
        Some(CartNotice::BatchFinished { code: ErrorCode::BatchPartialFailure, ref failed, .. }) if failed.len() == 1
    ));
}

#[tokio::test]
async fn test_print_all_partial_failure() {
    let store = MemoryOrderStore::new(seed());
    store.fail_print(2);
    let mut h = Harness::start(store).await;

    let report = h.handle.print_all().await.unwrap();
    assert_eq!(report.action, BatchAction::Print);
    assert_eq!(report.succeeded, vec![1]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 2);
    assert!(report.failed[0].1.starts_with("Printer error"));
    assert_eq!(report.summary(), "1 of 2 orders failed");
    assert_eq!(h.store.printed(), vec![1]);

    let view = h.wait_for(|v| v.last_report.is_some()).await;
    assert_eq!(view.summary.order_count, 2);
}

#[tokio::test]
async fn test_print_selected_runs_one_job_at_a_time() {
    let store = MemoryOrderStore::new(seed()).with_latency(Duration::from_millis(5));
    let mut h = Harness::start(store).await;

    h.handle.select_all().await.unwrap();
    h.wait_for(|v| v.selected.len() == 2).await;

    let report = h.handle.print_all().await.unwrap();
    assert!(report.is_complete_success());
    assert_eq!(report.summary(), "2 orders printed");
    assert_eq!(h.store.printed(), vec![1, 2]);
    assert_eq!(h.store.max_in_flight(), 1);

    // Printing does not touch the open set or the selection
    let view = h.wait_for(|v| v.last_report.is_some()).await;
    assert_eq!(view.summary.order_count, 2);
    assert_eq!(view.selected.len(), 2);
}

#[tokio::test]
async fn test_batch_finishes_after_view_detached() {
    let store = Arc::new(MemoryOrderStore::new(seed()).with_latency(Duration::from_millis(5)));
    let (worker, handle, mut view_rx) = CartWorker::new(
        &EngineConfig::default(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(worker.run(shutdown.clone()));
    view_rx.wait_for(|v| !v.state.is_loading()).await.unwrap();

    handle
        .send(CartIntent::PlaceAll { reply: None })
        .await
        .unwrap();
    drop(view_rx);

    // Queued behind the place batch, so it returns once that batch is done
    let report = handle.print_all().await.unwrap();
    assert_eq!(report.action, BatchAction::Print);
    assert!(store.open_orders().is_empty());
    assert_eq!(store.calls()[..2], [ServiceCall::Place(1), ServiceCall::Place(2)]);

    drop(handle);
    task.await.unwrap();
}

#[tokio::test]
async fn test_add_on_toggle_reprices_upstream() {
    let store = MemoryOrderStore::new(seed()).with_add_ons(vec![
        AddOnItem {
            item_id: 5,
            name: "Fries".to_string(),
            price: 30,
            is_applicable: true,
        },
        AddOnItem {
            item_id: 6,
            name: "Soup".to_string(),
            price: 40,
            is_applicable: false,
        },
    ]);
    let mut h = Harness::start(store).await;

    let view = h.wait_for(|v| !v.add_ons.is_empty()).await;
    assert_eq!(view.add_ons.len(), 1);

    h.handle.toggle_add_on(1, 5).await.unwrap();
    let view = h.wait_for(|v| v.summary.grand_total == 200).await;
    let order = &view.state.data().unwrap()[0];
    assert!(order.add_on_item_ids.contains(&5));
    assert_eq!(order.price.base_price, 130);
}

#[tokio::test]
async fn test_empty_open_set() {
    let mut h = Harness::start(MemoryOrderStore::new(Vec::new())).await;
    let view = h.wait_for(|v| !v.state.is_loading()).await;
    assert_eq!(view.state, UiState::Empty);

    let report = h.handle.place_all().await.unwrap();
    assert_eq!(report.total(), 0);
}
