//! Data models
//!
//! Shared between floor-server and its clients (guest app, admin console).
//! Dish IDs are slugs (`"pho-bo"`), table IDs are `i64`.

pub mod dining_table;
pub mod dish;

// Re-exports
pub use dining_table::*;
pub use dish::*;
