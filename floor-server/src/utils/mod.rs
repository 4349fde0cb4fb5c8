//! Utilities
//!
//! - [`AppError`] / [`ApiResponse`] - unified error model (from shared::error)
//! - [`logger`] - tracing setup

pub mod logger;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
