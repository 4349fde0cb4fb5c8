//! Order Module
//!
//! - Snapshots: the committed [`Order`] and its [`OrderStatus`]
//! - Types: line items, cart input and [`Bill`]
//! - Events: facts broadcast after each floor mutation

pub mod event;
pub mod snapshot;
pub mod types;

// Re-exports
pub use event::{FloorEvent, FloorEventPayload};
pub use snapshot::{Order, OrderStatus};
pub use types::*;
