//! Open order model
//!
//! Types describing the orders currently held in the cart:
//! - [`Order`]: one open order with its product lines and add-ons
//! - [`ProductLine`]: a product and its quantity within an order
//! - [`OrderPrice`]: the upstream-computed base/discount price pair

pub mod types;

// Re-exports
pub use types::*;
