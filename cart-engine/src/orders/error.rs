use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Cart engine errors
///
/// `OrderNotFound` / `ProductNotFound` are expected while a fresh snapshot is
/// in flight and are treated as no-ops by the event loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate order {0} in snapshot")]
    DuplicateOrder(i64),

    #[error("Invalid price for order {order_id}: {reason}")]
    InvalidPrice { order_id: i64, reason: String },

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Product {product_id} not found in order {order_id}")]
    ProductNotFound { order_id: i64, product_id: i64 },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Place order failed: {0}")]
    PlaceFailed(String),

    #[error("Printer error: {0}")]
    Printer(String),

    #[error("Cart engine unavailable: {0}")]
    Channel(String),
}

impl CartError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    pub fn printer(msg: impl Into<String>) -> Self {
        Self::Printer(msg.into())
    }

    /// Order or product vanished from the store
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::OrderNotFound(_) | Self::ProductNotFound { .. })
    }

    /// External collaborator failure (place and printer failures included)
    pub fn is_repository(&self) -> bool {
        matches!(self, Self::Repository(_) | Self::PlaceFailed(_) | Self::Printer(_))
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::Validation(msg) => AppError::validation(msg),
            CartError::DuplicateOrder(id) => AppError::with_message(
                ErrorCode::DuplicateOrder,
                format!("Duplicate order {} in snapshot", id),
            )
            .with_detail("order_id", id),
            CartError::InvalidPrice { order_id, reason } => AppError::with_message(
                ErrorCode::InvalidPrice,
                format!("Invalid price for order {}: {}", order_id, reason),
            )
            .with_detail("order_id", order_id),
            CartError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order not found: {}", id))
                    .with_detail("order_id", id)
            }
            CartError::ProductNotFound {
                order_id,
                product_id,
            } => AppError::with_message(
                ErrorCode::OrderItemNotFound,
                format!("Product {} not found in order {}", product_id, order_id),
            )
            .with_detail("order_id", order_id)
            .with_detail("product_id", product_id),
            CartError::Repository(msg) => AppError::repository(msg),
            CartError::PlaceFailed(msg) => AppError::with_message(ErrorCode::PlaceOrderFailed, msg),
            CartError::Printer(msg) => AppError::with_message(ErrorCode::PrintFailed, msg),
            CartError::Channel(msg) => AppError::new(ErrorCode::EngineUnavailable).with_detail("reason", msg),
        }
    }
}

pub type CartResult<T> = Result<T, CartError>;
