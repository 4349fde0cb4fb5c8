//! API routes
//!
//! - [`health`] - liveness
//! - [`menu`] - guest menu, price preview, admin dish edits
//! - [`tables`] - floor view, occupancy, bill, promotion, checkout, history
//! - [`orders`] - cart commit, admin order list, status changes
//! - [`promotions`] - code validation and bulk apply
//! - [`chat`] - assistant
//! - [`notifications`] - staff inbox, unread count, mark as read

pub mod chat;
pub mod health;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod promotions;
pub mod tables;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
