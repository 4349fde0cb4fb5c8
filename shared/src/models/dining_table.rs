//! Dining Table Model

use crate::order::{Bill, Order};
use crate::types::{TableId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Occupancy state of a table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Trống
    #[default]
    Empty,
    /// Có khách
    Occupied,
    /// Đã đặt
    Reserved,
}

impl TableStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            TableStatus::Empty => "empty",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One closed session of a table, written at checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// "HH:MM - HH:MM" (seated - checked out)
    pub time: String,
    /// Human-readable summary, e.g. "Thanh toán: 270000đ (2 món)"
    pub info: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in: Option<Timestamp>,
    pub closed_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    pub bill: Bill,
    /// The orders settled by this checkout, all `paid`
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Dining table entity (bàn)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub area: String,
    pub status: TableStatus,
    /// Set once when the table becomes occupied, cleared at checkout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in: Option<Timestamp>,
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Newest first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub active_discount_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_discount_code: Option<String>,
}

impl Table {
    pub fn new(id: TableId, name: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            area: area.into(),
            status: TableStatus::Empty,
            time_in: None,
            orders: Vec::new(),
            history: Vec::new(),
            active_discount_rate: None,
            active_discount_code: None,
        }
    }

    pub fn with_status(mut self, status: TableStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_time_in(mut self, time_in: Timestamp) -> Self {
        self.time_in = Some(time_in);
        self
    }

    /// Orders not yet paid
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.is_open())
    }

    pub fn has_open_orders(&self) -> bool {
        self.orders.iter().any(Order::is_open)
    }

    pub fn find_order_mut(&mut self, order_id: &str) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| o.id == order_id)
    }

    /// Become occupied; `time_in` is stamped only if not already set
    pub fn occupy(&mut self, now: Timestamp) {
        self.status = TableStatus::Occupied;
        if self.time_in.is_none() {
            self.time_in = Some(now);
        }
    }

    pub fn set_promotion(&mut self, code: impl Into<String>, rate: Decimal) {
        self.active_discount_code = Some(code.into());
        self.active_discount_rate = Some(rate);
    }

    pub fn clear_promotion(&mut self) {
        self.active_discount_code = None;
        self.active_discount_rate = None;
    }
}

/// Result of a successful checkout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutReceipt {
    pub table_id: TableId,
    pub table_name: String,
    pub entry: HistoryEntry,
}
