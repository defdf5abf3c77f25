//! BatchActionCoordinator
//!
//! Fans a place/print action out over the target orders one at a time.
//!
//! # Flow
//!
//! ```text
//! targets = selection (if any) else all visible ids, ascending
//!     for each id:
//!         ├─ await callback(id)           (never two in flight)
//!         ├─ record Succeeded / Failed    (failure does not abort)
//!         └─ report progress
//! ```
//!
//! The print path shares one physical printer that accepts a single job at
//! a time, so the sequential loop is the only thing keeping jobs apart.

use super::report::{BatchAction, BatchOutcome, BatchProgress, BatchReport};
use crate::cart::SelectionManager;
use crate::orders::{CartError, CartResult};
use crate::services::OrderService;
use chrono::Utc;
use std::collections::BTreeSet;
use std::future::Future;
use tracing::{Span, debug, info, instrument, warn};
use uuid::Uuid;

pub struct BatchCoordinator;

impl BatchCoordinator {
    /// Selected ids if any are selected, otherwise every visible id
    pub fn targets(selection: &SelectionManager, visible: &BTreeSet<i64>) -> Vec<i64> {
        if selection.is_empty() {
            visible.iter().copied().collect()
        } else {
            selection.ids().iter().copied().collect()
        }
    }

    /// Run `callback` for every target in order, collecting per-order outcomes
    #[instrument(skip_all, fields(action = %action, targets = targets.len(), batch_id = tracing::field::Empty))]
    pub async fn run<F, Fut, P>(
        action: BatchAction,
        targets: Vec<i64>,
        mut callback: F,
        mut on_progress: P,
    ) -> BatchReport
    where
        F: FnMut(i64) -> Fut,
        Fut: Future<Output = CartResult<()>>,
        P: FnMut(&BatchProgress),
    {
        let batch_id = Uuid::new_v4();
        Span::current().record("batch_id", tracing::field::display(batch_id));

        let total = targets.len();
        let mut report = BatchReport {
            batch_id,
            action,
            started_at: Utc::now().timestamp_millis(),
            finished_at: 0,
            succeeded: Vec::with_capacity(total),
            failed: Vec::new(),
        };
        info!("Batch started");

        for (idx, order_id) in targets.into_iter().enumerate() {
            let outcome = match callback(order_id).await {
                Ok(()) => {
                    debug!(order_id, "Batch item succeeded");
                    BatchOutcome::Succeeded { order_id }
                }
                Err(e) => {
                    warn!(order_id, error = %e, "Batch item failed");
                    BatchOutcome::Failed {
                        order_id,
                        reason: e.to_string(),
                    }
                }
            };
            report.record(&outcome);
            on_progress(&BatchProgress {
                batch_id,
                action,
                completed: idx + 1,
                total,
                last: outcome,
            });
        }

        report.finished_at = Utc::now().timestamp_millis();
        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Batch finished"
        );
        report
    }

    pub async fn place_all<P>(service: &dyn OrderService, targets: Vec<i64>, on_progress: P) -> BatchReport
    where
        P: FnMut(&BatchProgress),
    {
        Self::run(
            BatchAction::Place,
            targets,
            |order_id| async move { service.place_order(order_id).await.map_err(as_place_error) },
            on_progress,
        )
        .await
    }

    pub async fn print_all<P>(service: &dyn OrderService, targets: Vec<i64>, on_progress: P) -> BatchReport
    where
        P: FnMut(&BatchProgress),
    {
        Self::run(
            BatchAction::Print,
            targets,
            |order_id| async move { service.print_order(order_id).await.map_err(as_printer_error) },
            on_progress,
        )
        .await
    }
}

/// Repository failures on the place path are place failures
fn as_place_error(err: CartError) -> CartError {
    match err {
        CartError::Repository(msg) => CartError::PlaceFailed(msg),
        other => other,
    }
}

/// Repository failures on the print path are printer failures
fn as_printer_error(err: CartError) -> CartError {
    match err {
        CartError::Repository(msg) => CartError::Printer(msg),
        other => other,
    }
}
