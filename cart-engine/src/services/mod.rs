//! External collaborators
//!
//! - **traits**: contracts the engine consumes (snapshots, order service, add-on catalog)
//! - **memory**: in-memory implementation of all three, used by tests and local runs

pub mod memory;
pub mod traits;

pub use memory::{MemoryOrderStore, ServiceCall};
pub use traits::{AddOnCatalog, OrderDataSource, OrderService, OrderStream};
