//! Cart Worker
//!
//! 单线程事件循环：订单快照流 + 用户操作通道，逐个处理，
//! 每次状态变化后通过 watch 通道发布 [`CartView`]。
//!
//! - 快照与用户操作永不并发，所有修改都经过 [`CartEngine`]
//! - 批量下单/打印期间循环被占用，新的快照在批量结束后才应用
//! - 视图订阅者全部断开后不再发布，但进行中的批量会执行完

use super::cart_engine::CartEngine;
use crate::batch::{BatchAction, BatchProgress, BatchReport};
use crate::core::EngineConfig;
use crate::orders::{CartError, CartResult, MutationOutcome};
use crate::pricing::CartSummary;
use crate::projection::UiState;
use crate::services::{AddOnCatalog, OrderDataSource, OrderService};
use futures::StreamExt;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{AddOnItem, CatalogProduct};
use shared::order::{Order, OrderType};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

/// User intent queued for the worker
#[derive(Debug)]
pub enum CartIntent {
    Increase {
        order_id: i64,
        product: CatalogProduct,
    },
    IncreaseLine {
        order_id: i64,
        product_id: i64,
    },
    Decrease {
        order_id: i64,
        product_id: i64,
    },
    ToggleAddOn {
        order_id: i64,
        add_on_item_id: i64,
    },
    ToggleSelect(i64),
    SelectAll,
    ClearSelection,
    RefreshAddOns,
    PlaceAll {
        reply: Option<oneshot::Sender<BatchReport>>,
    },
    PrintAll {
        reply: Option<oneshot::Sender<BatchReport>>,
    },
}

/// One-shot message for the rendering layer (latest one wins)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartNotice {
    /// Last product removed; the repository decides what happens to the order
    OrderEmptied { order_id: i64 },
    SnapshotRejected { code: ErrorCode, reason: String },
    BatchFinished {
        code: ErrorCode,
        summary: String,
        failed: Vec<(i64, String)>,
    },
    Failed { code: ErrorCode, message: String },
}

/// Everything the rendering layer needs, republished after every change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub state: UiState<Vec<Order>>,
    pub selected: BTreeSet<i64>,
    pub summary: CartSummary,
    pub add_ons: Vec<AddOnItem>,
    /// Progress of the running batch, if any
    pub batch: Option<BatchProgress>,
    pub last_report: Option<BatchReport>,
    pub notice: Option<CartNotice>,
}

impl Default for CartView {
    fn default() -> Self {
        Self {
            state: UiState::Loading,
            selected: BTreeSet::new(),
            summary: CartSummary::default(),
            add_ons: Vec::new(),
            batch: None,
            last_report: None,
            notice: None,
        }
    }
}

/// Cloneable sender side of the worker
#[derive(Debug, Clone)]
pub struct CartHandle {
    tx: mpsc::Sender<CartIntent>,
}

impl CartHandle {
    pub async fn send(&self, intent: CartIntent) -> CartResult<()> {
        self.tx
            .send(intent)
            .await
            .map_err(|_| CartError::Channel("cart worker stopped".to_string()))
    }

    pub async fn increase(&self, order_id: i64, product: CatalogProduct) -> CartResult<()> {
        self.send(CartIntent::Increase { order_id, product }).await
    }

    pub async fn increase_line(&self, order_id: i64, product_id: i64) -> CartResult<()> {
        self.send(CartIntent::IncreaseLine { order_id, product_id }).await
    }

    pub async fn decrease(&self, order_id: i64, product_id: i64) -> CartResult<()> {
        self.send(CartIntent::Decrease { order_id, product_id }).await
    }

    pub async fn toggle_add_on(&self, order_id: i64, add_on_item_id: i64) -> CartResult<()> {
        self.send(CartIntent::ToggleAddOn {
            order_id,
            add_on_item_id,
        })
        .await
    }

    pub async fn toggle_select(&self, order_id: i64) -> CartResult<()> {
        self.send(CartIntent::ToggleSelect(order_id)).await
    }

    pub async fn select_all(&self) -> CartResult<()> {
        self.send(CartIntent::SelectAll).await
    }

    pub async fn clear_selection(&self) -> CartResult<()> {
        self.send(CartIntent::ClearSelection).await
    }

    pub async fn refresh_add_ons(&self) -> CartResult<()> {
        self.send(CartIntent::RefreshAddOns).await
    }

    /// Place every target order and wait for the report
    pub async fn place_all(&self) -> CartResult<BatchReport> {
        let (tx, rx) = oneshot::channel();
        self.send(CartIntent::PlaceAll { reply: Some(tx) }).await?;
        rx.await
            .map_err(|_| CartError::Channel("batch reply dropped".to_string()))
    }

    /// Print every target order and wait for the report
    pub async fn print_all(&self) -> CartResult<BatchReport> {
        let (tx, rx) = oneshot::channel();
        self.send(CartIntent::PrintAll { reply: Some(tx) }).await?;
        rx.await
            .map_err(|_| CartError::Channel("batch reply dropped".to_string()))
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// 购物车工作者
pub struct CartWorker {
    engine: CartEngine,
    order_type: Option<OrderType>,
    data_source: Arc<dyn OrderDataSource>,
    catalog: Arc<dyn AddOnCatalog>,
    intent_rx: mpsc::Receiver<CartIntent>,
    view_tx: watch::Sender<CartView>,
}

impl CartWorker {
    pub fn new(
        config: &EngineConfig,
        data_source: Arc<dyn OrderDataSource>,
        service: Arc<dyn OrderService>,
        catalog: Arc<dyn AddOnCatalog>,
    ) -> (Self, CartHandle, watch::Receiver<CartView>) {
        let (intent_tx, intent_rx) = mpsc::channel(config.intent_queue);
        let (view_tx, view_rx) = watch::channel(CartView::default());
        let engine = CartEngine::new(service).with_optimistic_sync(config.optimistic_sync);

        let worker = Self {
            engine,
            order_type: config.order_type,
            data_source,
            catalog,
            intent_rx,
            view_tx,
        };
        (worker, CartHandle { tx: intent_tx }, view_rx)
    }

    /// 运行工作者（阻塞直到取消或所有 CartHandle 被丢弃）
    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!(order_type = ?self.order_type, "Cart worker started");
        self.refresh_add_ons().await;

        let mut snapshots = self.data_source.stream_open_orders(self.order_type);
        let mut stream_open = true;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Cart worker received shutdown signal");
                    break;
                }
                snapshot = snapshots.next(), if stream_open => {
                    match snapshot {
                        Some(orders) => self.handle_snapshot(orders),
                        None => {
                            tracing::warn!("Order snapshot stream ended, keeping last snapshot");
                            stream_open = false;
                        }
                    }
                }
                intent = self.intent_rx.recv() => {
                    let Some(intent) = intent else {
                        tracing::info!("Intent channel closed, cart worker stopping");
                        break;
                    };
                    self.handle_intent(intent).await;
                }
            }
        }
    }

    fn handle_snapshot(&mut self, orders: Vec<Order>) {
        let count = orders.len();
        match self.engine.apply_snapshot(orders) {
            Ok(pruned) => {
                tracing::debug!(orders = count, pruned = ?pruned, "Snapshot applied");
                self.publish(None);
            }
            Err(e) => {
                tracing::warn!(orders = count, error = %e, "Snapshot rejected, keeping previous");
                let app: AppError = e.into();
                self.publish(Some(CartNotice::SnapshotRejected {
                    code: app.code,
                    reason: app.message,
                }));
            }
        }
    }

    async fn handle_intent(&mut self, intent: CartIntent) {
        let result = match intent {
            CartIntent::Increase { order_id, product } => {
                self.engine.increase(order_id, &product).await.map(emptied_notice)
            }
            CartIntent::IncreaseLine { order_id, product_id } => {
                self.engine.increase_line(order_id, product_id).await.map(emptied_notice)
            }
            CartIntent::Decrease { order_id, product_id } => {
                self.engine.decrease(order_id, product_id).await.map(emptied_notice)
            }
            CartIntent::ToggleAddOn {
                order_id,
                add_on_item_id,
            } => self
                .engine
                .toggle_add_on(order_id, add_on_item_id)
                .await
                .map(|_| None),
            CartIntent::ToggleSelect(order_id) => self.engine.toggle_select(order_id).map(|_| None),
            CartIntent::SelectAll => {
                self.engine.select_all();
                Ok(None)
            }
            CartIntent::ClearSelection => {
                self.engine.clear_selection();
                Ok(None)
            }
            CartIntent::RefreshAddOns => {
                self.refresh_add_ons().await;
                return;
            }
            CartIntent::PlaceAll { reply } => {
                self.run_batch(BatchAction::Place, reply).await;
                return;
            }
            CartIntent::PrintAll { reply } => {
                self.run_batch(BatchAction::Print, reply).await;
                return;
            }
        };

        match result {
            Ok(notice) => self.publish(notice),
            // 快照已更新，目标不存在时静默忽略
            Err(e) if e.is_not_found() => {
                tracing::debug!(error = %e, "Intent target gone, ignoring");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cart intent failed");
                self.publish(Some(failure_notice(e)));
            }
        }
    }

    async fn run_batch(&mut self, action: BatchAction, reply: Option<oneshot::Sender<BatchReport>>) {
        let view_tx = &self.view_tx;
        let on_progress = |progress: &BatchProgress| {
            if !view_tx.is_closed() {
                view_tx.send_modify(|view| view.batch = Some(progress.clone()));
            }
        };

        let report = match action {
            BatchAction::Place => self.engine.place_all(on_progress).await,
            BatchAction::Print => self.engine.print_all(on_progress).await,
        };

        if !self.view_tx.is_closed() {
            let notice = CartNotice::BatchFinished {
                code: report.code(),
                summary: report.summary(),
                failed: report.failed.clone(),
            };
            self.view_tx.send_modify(|view| {
                view.batch = None;
                view.last_report = Some(report.clone());
                view.notice = Some(notice);
            });
        } else {
            tracing::debug!(batch_id = %report.batch_id, "No view subscribers, batch report not published");
        }

        if let Some(reply) = reply
            && reply.send(report).is_err()
        {
            tracing::debug!("Batch requester gone, dropping report");
        }
    }

    async fn refresh_add_ons(&mut self) {
        match self.catalog.list().await {
            Ok(items) => {
                self.engine.set_add_on_catalog(&items);
                tracing::debug!(available = self.engine.add_ons().len(), "Add-on catalog loaded");
                self.publish(None);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load add-on catalog");
                self.publish(Some(failure_notice(e)));
            }
        }
    }

    /// Republish the view; `None` keeps the previous notice
    ///
    /// An `OrderEmptied` notice is dropped once its order left the snapshot.
    fn publish(&self, notice: Option<CartNotice>) {
        if self.view_tx.is_closed() {
            return;
        }
        let engine = &self.engine;
        self.view_tx.send_modify(|view| {
            view.state = engine.ui_state();
            view.selected = engine.selection().ids().clone();
            view.summary = engine.summary();
            view.add_ons = engine.add_ons().to_vec();
            if notice.is_some() {
                view.notice = notice;
            }
            let stale = matches!(
                &view.notice,
                Some(CartNotice::OrderEmptied { order_id }) if engine.store().get(*order_id).is_none()
            );
            if stale {
                view.notice = None;
            }
        });
    }
}

fn emptied_notice(outcome: MutationOutcome) -> Option<CartNotice> {
    match outcome {
        MutationOutcome::OrderEmptied { order_id } => Some(CartNotice::OrderEmptied { order_id }),
        _ => None,
    }
}

fn failure_notice(err: CartError) -> CartNotice {
    let app: AppError = err.into();
    CartNotice::Failed {
        code: app.code,
        message: app.message,
    }
}
