//! Unified error system for the floor system
//!
//! This module provides the error model every client sees:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Error body sent to clients
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order and cart errors
//! - 5xxx: Promotion errors
//! - 6xxx: Dish errors
//! - 7xxx: Table errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::CartEmpty);
//!
//! let err = AppError::with_message(ErrorCode::InvalidPromotionCode, "mã giảm giá không hợp lệ")
//!     .with_detail("code", "CHIEN99");
//!
//! let response = ApiResponse::error(&err);
//! assert_eq!(response.code, 5001);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
