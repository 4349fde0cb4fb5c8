//! Status transition rules
//!
//! Order: `pending → preparing → ready → served → paid`
//! Item:  `cooking → ready → served`
//!
//! Both move strictly forward. Skipping ahead is allowed, standing still or
//! going back is not. `paid` is only written by checkout.

use super::manager::{ManagerError, ManagerResult};
use shared::order::{ItemStatus, OrderStatus};

/// Validate a direct order status change
pub fn check_order_transition(from: OrderStatus, to: OrderStatus) -> ManagerResult<()> {
    if to == OrderStatus::Paid || !to.is_ahead_of(from) {
        return Err(ManagerError::invalid_transition(from, to));
    }
    Ok(())
}

/// Validate a kitchen line status change
pub fn check_item_transition(from: ItemStatus, to: ItemStatus) -> ManagerResult<()> {
    if !to.is_ahead_of(from) {
        return Err(ManagerError::invalid_transition(from, to));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_forward_moves() {
        assert!(check_order_transition(OrderStatus::Pending, OrderStatus::Preparing).is_ok());
        assert!(check_order_transition(OrderStatus::Pending, OrderStatus::Served).is_ok());
        assert!(check_order_transition(OrderStatus::Ready, OrderStatus::Served).is_ok());
    }

    #[test]
    fn test_order_rejects_regression_and_repeat() {
        assert!(check_order_transition(OrderStatus::Ready, OrderStatus::Pending).is_err());
        assert!(check_order_transition(OrderStatus::Ready, OrderStatus::Ready).is_err());
    }

    #[test]
    fn test_paid_only_through_checkout() {
        let err = check_order_transition(OrderStatus::Served, OrderStatus::Paid).unwrap_err();
        assert_eq!(err.to_string(), "Invalid status transition: served -> paid");
        assert!(check_order_transition(OrderStatus::Paid, OrderStatus::Served).is_err());
    }

    #[test]
    fn test_item_transitions() {
        assert!(check_item_transition(ItemStatus::Cooking, ItemStatus::Ready).is_ok());
        assert!(check_item_transition(ItemStatus::Cooking, ItemStatus::Served).is_ok());
        assert!(check_item_transition(ItemStatus::Served, ItemStatus::Cooking).is_err());
        assert!(check_item_transition(ItemStatus::Ready, ItemStatus::Ready).is_err());
    }
}
