//! Unified error codes for the cart engine
//!
//! Error codes are organized by category:
//! - 0xxx: General
//! - 4xxx: Order / snapshot errors
//! - 5xxx: Batch action errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order item not found
    OrderItemNotFound = 4006,
    /// Duplicate order in snapshot
    DuplicateOrder = 4008,
    /// Invalid order price
    InvalidPrice = 4009,

    // ==================== 5xxx: Batch ====================
    /// Placing an order failed
    PlaceOrderFailed = 5001,
    /// Printing an order failed
    PrintFailed = 5002,
    /// Some orders of a batch failed
    BatchPartialFailure = 5003,

    // ==================== 9xxx: System ====================
    /// Repository (external service) error
    RepositoryError = 9002,
    /// Engine event loop is unavailable
    EngineUnavailable = 9003,
}

impl ErrorCode {
    /// Get the numeric code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::ValidationFailed => "Validation failed",

            Self::OrderNotFound => "Order not found",
            Self::OrderItemNotFound => "Order item not found",
            Self::DuplicateOrder => "Duplicate order in snapshot",
            Self::InvalidPrice => "Invalid order price",

            Self::PlaceOrderFailed => "Failed to place order",
            Self::PrintFailed => "Failed to print order",
            Self::BatchPartialFailure => "Some orders failed",

            Self::RepositoryError => "Repository error",
            Self::EngineUnavailable => "Cart engine unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            2 => Ok(Self::ValidationFailed),

            4001 => Ok(Self::OrderNotFound),
            4006 => Ok(Self::OrderItemNotFound),
            4008 => Ok(Self::DuplicateOrder),
            4009 => Ok(Self::InvalidPrice),

            5001 => Ok(Self::PlaceOrderFailed),
            5002 => Ok(Self::PrintFailed),
            5003 => Ok(Self::BatchPartialFailure),

            9002 => Ok(Self::RepositoryError),
            9003 => Ok(Self::EngineUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::PrintFailed.code(), 5002);
        assert_eq!(ErrorCode::DuplicateOrder.code(), 4008);
        assert_eq!(ErrorCode::RepositoryError.code(), 9002);
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(ErrorCode::try_from(6001), Err(InvalidErrorCode(6001)));
        assert_eq!(ErrorCode::try_from(4009), Ok(ErrorCode::InvalidPrice));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");

        let code: ErrorCode = serde_json::from_str("5003").unwrap();
        assert_eq!(code, ErrorCode::BatchPartialFailure);

        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::Success.to_string(), "E0000");
        assert_eq!(ErrorCode::InvalidPrice.to_string(), "E4009");
    }
}
