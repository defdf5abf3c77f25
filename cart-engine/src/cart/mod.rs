//! Cart state
//!
//! - **store**: the current snapshot of open orders
//! - **selection**: the user's multi-selection over that snapshot

pub mod selection;
pub mod store;

pub use selection::SelectionManager;
pub use store::CartStore;
