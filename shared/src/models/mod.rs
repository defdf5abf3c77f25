//! Reference data models
//!
//! Read-only catalog data consumed by the cart engine.
//! All IDs are `i64`.

pub mod add_on;
pub mod product;

// Re-exports
pub use add_on::*;
pub use product::*;
