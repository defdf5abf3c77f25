//! Pricing
//!
//! - **calculator**: per-order display total with price invariant checks
//! - **summary**: cart-wide counts and totals

pub mod calculator;
pub mod summary;

pub use calculator::PricingCalculator;
pub use summary::CartSummary;
