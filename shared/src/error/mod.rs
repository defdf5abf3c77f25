//! Unified error system for the cart engine
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order / snapshot errors
//! - 5xxx: Batch errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderNotFound);
//!
//! let err = AppError::validation("discount exceeds base price")
//!     .with_detail("order_id", 42);
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::AppError;
