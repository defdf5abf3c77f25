//! Batch place/print over the selected (or all visible) orders

pub mod coordinator;
pub mod report;

pub use coordinator::BatchCoordinator;
pub use report::{BatchAction, BatchOutcome, BatchProgress, BatchReport};
