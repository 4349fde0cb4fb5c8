//! Shared types for the floor system
//!
//! Data model, error model and small utilities used by the server and its
//! clients (guest app, admin console).

pub mod error;
pub mod models;
pub mod order;
pub mod types;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{CheckoutReceipt, Dish, HistoryEntry, Table, TableStatus};
pub use order::{Bill, FloorEvent, FloorEventPayload, ItemStatus, Order, OrderItem, OrderStatus};
pub use types::{SessionContext, TableId, Timestamp};
