//! Bill calculation
//!
//! Pure functions over a table snapshot. Nothing here is cached; callers
//! recompute after every mutation.

use rust_decimal::prelude::*;
use shared::models::Table;
use shared::order::Bill;

/// floor(amount × rate), in the smallest currency unit
///
/// Flooring the discount means the guest is never charged a fraction more
/// than the advertised price.
pub fn discount_amount(amount: i64, rate: Decimal) -> i64 {
    if amount <= 0 || rate <= Decimal::ZERO {
        return 0;
    }
    let rate = rate.min(Decimal::ONE);
    (Decimal::from(amount) * rate)
        .floor()
        .to_i64()
        .unwrap_or(0)
}

/// Price after a percentage discount (used by the menu preview)
pub fn discounted_price(unit_price: i64, rate: Decimal) -> i64 {
    unit_price - discount_amount(unit_price, rate)
}

/// Σ(unit_price × quantity) over all open orders
pub fn subtotal(table: &Table) -> i64 {
    table
        .open_orders()
        .fold(0i64, |acc, o| acc.saturating_add(o.items_total()))
}

/// Compute the payable bill for a table
pub fn compute_bill(table: &Table) -> Bill {
    let subtotal = subtotal(table);
    let discount_rate = table.active_discount_rate.unwrap_or(Decimal::ZERO);
    let discount_amount = discount_amount(subtotal, discount_rate);
    Bill {
        subtotal,
        discount_rate,
        discount_amount,
        final_total: subtotal - discount_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{ItemStatus, Order, OrderItem, OrderStatus};

    fn line(price: i64, qty: u32) -> OrderItem {
        OrderItem {
            dish_id: "x".into(),
            name: "X".into(),
            unit_price: price,
            quantity: qty,
            notes: String::new(),
            status: ItemStatus::Cooking,
        }
    }

    fn table_with(orders: Vec<Order>) -> Table {
        let mut table = Table::new(1, "Bàn 01", "Tầng 1");
        table.occupy(0);
        table.orders = orders;
        table
    }

    #[test]
    fn test_bill_with_fixed_code_rate() {
        let mut table = table_with(vec![Order::new("a".into(), 1, vec![line(300_000, 1)], 0)]);
        table.set_promotion("GIAM10", Decimal::new(10, 2));

        let bill = compute_bill(&table);
        assert_eq!(bill.subtotal, 300_000);
        assert_eq!(bill.discount_amount, 30_000);
        assert_eq!(bill.final_total, 270_000);
    }

    #[test]
    fn test_bill_without_promotion() {
        let table = table_with(vec![Order::new(
            "a".into(),
            1,
            vec![line(45_000, 2), line(15_000, 5)],
            0,
        )]);
        let bill = compute_bill(&table);
        assert_eq!(bill.subtotal, 165_000);
        assert_eq!(bill.discount_rate, Decimal::ZERO);
        assert_eq!(bill.final_total, 165_000);
    }

    #[test]
    fn test_paid_orders_excluded() {
        let mut paid = Order::new("p".into(), 1, vec![line(100_000, 1)], 0);
        paid.status = OrderStatus::Paid;
        let open = Order::new("o".into(), 1, vec![line(50_000, 1)], 0);
        let table = table_with(vec![paid, open]);
        assert_eq!(compute_bill(&table).subtotal, 50_000);
    }

    #[test]
    fn test_discount_floors() {
        // 33% of 45_001 = 14_850.33
        assert_eq!(discount_amount(45_001, Decimal::new(33, 2)), 14_850);
        assert_eq!(discounted_price(45_001, Decimal::new(33, 2)), 30_151);
        assert_eq!(discount_amount(0, Decimal::new(50, 2)), 0);
        assert_eq!(discount_amount(1_000, Decimal::ZERO), 0);
    }

    #[test]
    fn test_compute_bill_is_idempotent() {
        let mut table = table_with(vec![Order::new("a".into(), 1, vec![line(99_999, 3)], 0)]);
        table.set_promotion("CHIEN15", Decimal::new(15, 2));
        assert_eq!(compute_bill(&table), compute_bill(&table));
    }
}
