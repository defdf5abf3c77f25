//! Shared types for the cart engine
//!
//! Common types used across crates: the open-order data model,
//! catalog reference data and the unified error system.

pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, ErrorCode};
pub use models::{AddOnItem, CatalogProduct};
pub use order::{Order, OrderPrice, OrderType, ProductLine};
