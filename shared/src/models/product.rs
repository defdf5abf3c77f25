//! Product Model

use serde::{Deserialize, Serialize};

/// Catalog product, as offered when adding an item to an existing cart
///
/// Read-only reference data owned by the catalog screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: i64,
    pub name: String,
    /// Unit price in minor currency units
    pub price: i64,
}

impl CatalogProduct {
    pub fn new(id: i64, name: impl Into<String>, price: i64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}
