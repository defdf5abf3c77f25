//! Cart engine
//!
//! - **cart_engine**: the single write path over store, selection and batches
//! - **worker**: event loop feeding snapshots and user intents into the engine
//!
//! # Architecture
//!
//! ```text
//! OrderDataSource ──snapshot──┐
//!                             ▼
//! CartHandle ──intent──▶ CartWorker ──▶ CartEngine ──▶ OrderService
//!                             │
//!                             └──watch──▶ CartView (rendering layer)
//! ```

pub mod cart_engine;
pub mod worker;

pub use cart_engine::CartEngine;
pub use worker::{CartHandle, CartIntent, CartNotice, CartView, CartWorker};
