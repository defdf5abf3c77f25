//! Order mutations
//!
//! - **quantity**: per-line increment/decrement with line removal
//! - **add_on**: add-on membership toggling and catalog filtering
//! - **error**: engine error type shared by every module
//!
//! Mutations only touch the local snapshot. Persisting them is the caller's
//! job (see `engine::CartEngine`), and the next snapshot reconciles.

mod error;
pub mod add_on;
pub mod quantity;

pub use add_on::{AddOnSelector, AddOnToggle};
pub use error::{CartError, CartResult};
pub use quantity::{MutationOutcome, QuantityMutator};
