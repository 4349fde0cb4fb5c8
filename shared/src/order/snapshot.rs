//! Order record and its top-level status
//!
//! An [`Order`] is the immutable record of one committed cart. Line items are
//! price/name snapshots, so menu edits never rewrite history.

use super::types::OrderItem;
use crate::types::{TableId, Timestamp};
use serde::{Deserialize, Serialize};

/// Order status
///
/// Strictly forward-moving: `Pending → Preparing → Ready → Served → Paid`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
    Paid,
}

impl OrderStatus {
    /// Position in the lifecycle (pending = 0 … paid = 4)
    pub const fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Preparing => 1,
            OrderStatus::Ready => 2,
            OrderStatus::Served => 3,
            OrderStatus::Paid => 4,
        }
    }

    /// The immediate successor, if any
    pub const fn next(self) -> Option<Self> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Served),
            OrderStatus::Served => Some(OrderStatus::Paid),
            OrderStatus::Paid => None,
        }
    }

    /// True when `self` lies strictly after `other`
    pub const fn is_ahead_of(self, other: Self) -> bool {
        self.rank() > other.rank()
    }

    /// Non-paid orders are open and still belong to the table
    pub const fn is_open(self) -> bool {
        !matches!(self, OrderStatus::Paid)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order - one placed batch of dishes tied to a table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (assigned by server)
    pub id: String,
    /// Table the order was placed at
    pub table_id: TableId,
    /// Line items, in cart order
    pub items: Vec<OrderItem>,
    /// Kitchen-progress status
    pub status: OrderStatus,
    /// Σ(unit_price × quantity), fixed at commit time
    pub total_amount: i64,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last status change
    pub updated_at: Timestamp,
}

impl Order {
    /// Build a pending order, computing `total_amount` from the items
    pub fn new(id: String, table_id: TableId, items: Vec<OrderItem>, created_at: Timestamp) -> Self {
        let total_amount = sum_line_totals(&items);
        Self {
            id,
            table_id,
            items,
            status: OrderStatus::Pending,
            total_amount,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Current Σ(unit_price × quantity) over the items
    pub fn items_total(&self) -> i64 {
        sum_line_totals(&self.items)
    }

    /// Total number of dishes (sum of quantities), saturating
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }
}

fn sum_line_totals(items: &[OrderItem]) -> i64 {
    items
        .iter()
        .fold(0i64, |acc, i| acc.saturating_add(i.line_total()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::ItemStatus;

    fn item(name: &str, price: i64, qty: u32) -> OrderItem {
        OrderItem {
            dish_id: name.to_lowercase(),
            name: name.to_string(),
            unit_price: price,
            quantity: qty,
            notes: String::new(),
            status: ItemStatus::Cooking,
        }
    }

    #[test]
    fn test_status_order() {
        let all = [
            OrderStatus::Pending,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Served,
            OrderStatus::Paid,
        ];
        for pair in all.windows(2) {
            assert!(pair[1].is_ahead_of(pair[0]));
            assert!(!pair[0].is_ahead_of(pair[1]));
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(OrderStatus::Paid.next(), None);
        assert!(!OrderStatus::Ready.is_ahead_of(OrderStatus::Ready));
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"preparing\"");
        let status: OrderStatus = serde_json::from_str("\"served\"").unwrap();
        assert_eq!(status, OrderStatus::Served);
    }

    #[test]
    fn test_new_order_total() {
        let order = Order::new(
            "o-1".to_string(),
            2,
            vec![item("Pho", 45_000, 2), item("Bia", 15_000, 5)],
            0,
        );
        assert_eq!(order.total_amount, 165_000);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.item_count(), 7);
        assert!(order.is_open());
    }

    #[test]
    fn test_huge_lines_do_not_overflow() {
        let order = Order::new(
            "o-2".to_string(),
            1,
            vec![
                item("A", i64::MAX / 2, u32::MAX),
                item("B", i64::MAX / 2, u32::MAX),
            ],
            0,
        );
        assert_eq!(order.total_amount, i64::MAX);
        assert_eq!(order.item_count(), u32::MAX);
    }
}
