//! Floor events - facts broadcast after a command has been applied

use super::snapshot::OrderStatus;
use super::types::ItemStatus;
use crate::models::TableStatus;
use crate::types::{TableId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Floor event - one mutation of table/order state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloorEvent {
    /// Monotonic sequence within one server epoch
    pub sequence: u64,
    pub timestamp: Timestamp,
    pub table_id: TableId,
    pub payload: FloorEventPayload,
}

/// Event payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FloorEventPayload {
    OrderPlaced {
        order_id: String,
        total_amount: i64,
        item_count: u32,
    },
    OrderStatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
    ItemStatusChanged {
        order_id: String,
        item_index: usize,
        from: ItemStatus,
        to: ItemStatus,
    },
    /// A dish reached `ready` - staff should pick it up
    ItemReady {
        order_id: String,
        item_index: usize,
        name: String,
    },
    TableStatusChanged {
        from: TableStatus,
        to: TableStatus,
    },
    PromotionApplied {
        code: String,
        #[serde(with = "rust_decimal::serde::float")]
        rate: Decimal,
    },
    PromotionCleared {
        rejected_code: String,
    },
    TableCheckedOut {
        final_total: i64,
        order_count: usize,
    },
}

impl FloorEventPayload {
    pub fn name(&self) -> &'static str {
        match self {
            FloorEventPayload::OrderPlaced { .. } => "ORDER_PLACED",
            FloorEventPayload::OrderStatusChanged { .. } => "ORDER_STATUS_CHANGED",
            FloorEventPayload::ItemStatusChanged { .. } => "ITEM_STATUS_CHANGED",
            FloorEventPayload::ItemReady { .. } => "ITEM_READY",
            FloorEventPayload::TableStatusChanged { .. } => "TABLE_STATUS_CHANGED",
            FloorEventPayload::PromotionApplied { .. } => "PROMOTION_APPLIED",
            FloorEventPayload::PromotionCleared { .. } => "PROMOTION_CLEARED",
            FloorEventPayload::TableCheckedOut { .. } => "TABLE_CHECKED_OUT",
        }
    }
}

impl std::fmt::Display for FloorEventPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
