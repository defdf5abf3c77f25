//! Add-on Item Model

use serde::{Deserialize, Serialize};

/// Add-on item (side item, extra) a customer may attach to an order
///
/// Supplied by the add-on catalog; the cart engine never modifies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnItem {
    pub item_id: i64,
    pub name: String,
    /// Price in minor currency units
    pub price: i64,
    /// Whether the item is currently offerable
    pub is_applicable: bool,
}
