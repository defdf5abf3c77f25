//! Batch outcome types

use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchAction {
    Place,
    Print,
}

impl fmt::Display for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchAction::Place => write!(f, "place"),
            BatchAction::Print => write!(f, "print"),
        }
    }
}

/// Outcome of one order within a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchOutcome {
    Succeeded { order_id: i64 },
    Failed { order_id: i64, reason: String },
}

impl BatchOutcome {
    pub fn order_id(&self) -> i64 {
        match self {
            BatchOutcome::Succeeded { order_id } | BatchOutcome::Failed { order_id, .. } => *order_id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Succeeded { .. })
    }
}

/// Progress after each processed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub batch_id: Uuid,
    pub action: BatchAction,
    pub completed: usize,
    pub total: usize,
    pub last: BatchOutcome,
}

/// Final result of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub action: BatchAction,
    /// Unix millis
    pub started_at: i64,
    pub finished_at: i64,
    pub succeeded: Vec<i64>,
    pub failed: Vec<(i64, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// `Success`, or `BatchPartialFailure` when any order failed
    pub fn code(&self) -> ErrorCode {
        if self.failed.is_empty() {
            ErrorCode::Success
        } else {
            ErrorCode::BatchPartialFailure
        }
    }

    /// User-facing one-liner
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            let verb = match self.action {
                BatchAction::Place => "placed",
                BatchAction::Print => "printed",
            };
            format!("{} orders {}", self.total(), verb)
        } else {
            format!("{} of {} orders failed", self.failed.len(), self.total())
        }
    }

    pub(crate) fn record(&mut self, outcome: &BatchOutcome) {
        match outcome {
            BatchOutcome::Succeeded { order_id } => self.succeeded.push(*order_id),
            BatchOutcome::Failed { order_id, reason } => self.failed.push((*order_id, reason.clone())),
        }
    }
}
