//! UI state projection
//!
//! Pure mapping from `{loading, snapshot}` to the tagged state consumed by
//! rendering. No hidden state: it is recomputed on every snapshot change.

use serde::{Deserialize, Serialize};
use shared::order::Order;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum UiState<T> {
    Loading,
    Empty,
    Success(T),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            UiState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UiState<U> {
        match self {
            UiState::Loading => UiState::Loading,
            UiState::Empty => UiState::Empty,
            UiState::Success(data) => UiState::Success(f(data)),
        }
    }
}

pub struct UiStateProjector;

impl UiStateProjector {
    pub fn project(loading: bool, orders: Vec<Order>) -> UiState<Vec<Order>> {
        if loading {
            UiState::Loading
        } else if orders.is_empty() {
            UiState::Empty
        } else {
            UiState::Success(orders)
        }
    }
}
