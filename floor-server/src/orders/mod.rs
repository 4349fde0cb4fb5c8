//! Order and table lifecycle
//!
//! - **cart**: pre-commit staging of a guest's selection
//! - **lifecycle**: forward-only status rules for orders and order lines
//! - **manager**: `FloorManager`, the single mutation authority
//! - **storage**: `TableStore` persistence (redb / in-memory)
//! - **simulator**: kitchen stand-in that advances open orders
//!
//! # Data Flow
//!
//! ```text
//! Guest cart ─┐
//! Console ────┼─→ FloorManager ─→ TableStore (redb)
//! Simulator ──┘        ↓
//!                 FloorEvent broadcast
//! ```

pub mod cart;
pub mod lifecycle;
pub mod manager;
pub mod simulator;
pub mod storage;

// Re-exports
pub use cart::{Cart, CartError, CartLine};
pub use manager::{FloorManager, ManagerError, ManagerResult};
pub use simulator::{
    AdvancementStrategy, ImmediateAdvancement, LifecycleSimulator, RandomAdvancement,
};
pub use storage::{MemoryTableStore, RedbTableStore, StorageError, TableStore};

// Re-export shared types for convenience
pub use shared::order::{FloorEvent, FloorEventPayload, ItemStatus, Order, OrderStatus};
