//! Shared types for orders, carts and bills

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Item Status
// ============================================================================

/// Kitchen status of one order line
///
/// Tracked per line for the kitchen UI; independent of [`super::OrderStatus`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Đang làm
    #[default]
    Cooking,
    /// Sẵn sàng
    Ready,
    /// Đã phục vụ
    Served,
}

impl ItemStatus {
    pub const fn rank(self) -> u8 {
        match self {
            ItemStatus::Cooking => 0,
            ItemStatus::Ready => 1,
            ItemStatus::Served => 2,
        }
    }

    pub const fn is_ahead_of(self, other: Self) -> bool {
        self.rank() > other.rank()
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Cooking => "cooking",
            ItemStatus::Ready => "ready",
            ItemStatus::Served => "served",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Order Item
// ============================================================================

/// Largest quantity one order line may carry
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Largest number of dishes one order may carry (sum over lines)
pub const MAX_ORDER_QUANTITY: u32 = 9_999;

/// Order line snapshot - name and price copied at commit time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    /// Dish the line was created from (reference only, never re-read)
    pub dish_id: String,
    pub name: String,
    pub unit_price: i64,
    pub quantity: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: ItemStatus,
}

impl OrderItem {
    /// unit_price × quantity, saturating at `i64::MAX`
    pub fn line_total(&self) -> i64 {
        self.unit_price.saturating_mul(i64::from(self.quantity))
    }
}

// ============================================================================
// Cart Input
// ============================================================================

/// One cart line as sent by the guest app
///
/// Quantity is signed on the wire so that bad input can be rejected with a
/// proper error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineInput {
    pub dish_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub notes: String,
}

// ============================================================================
// Bill
// ============================================================================

/// Payable amount for a table, derived on demand from its open orders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Bill {
    /// Σ(unit_price × quantity) over open orders
    pub subtotal: i64,
    /// Active promotion rate (0 when none)
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_rate: Decimal,
    /// floor(subtotal × discount_rate)
    pub discount_amount: i64,
    /// subtotal − discount_amount
    pub final_total: i64,
}
