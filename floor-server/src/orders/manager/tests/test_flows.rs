use super::*;
use crate::orders::simulator::{ImmediateAdvancement, RandomAdvancement};

// ========================================================================
// Checkout
// ========================================================================

#[test]
fn test_checkout_moves_orders_to_history() {
    let manager = create_test_manager();
    let order = place_standard(&manager, 1);
    manager.apply_promotion(1, "GIAM10").unwrap();

    let receipt = manager.checkout(1).unwrap();
    assert_eq!(receipt.table_id, 1);
    assert_eq!(receipt.table_name, "Bàn 01");
    assert_eq!(receipt.entry.bill.subtotal, 165_000);
    assert_eq!(receipt.entry.bill.final_total, 148_500);
    assert_eq!(receipt.entry.discount_code.as_deref(), Some("GIAM10"));
    assert_eq!(receipt.entry.info, "Thanh toán: 148500đ (2 món)");
    assert!(receipt.entry.orders.iter().all(|o| o.status == OrderStatus::Paid));

    let table = manager.get_table(1).unwrap();
    assert_eq!(table.status, TableStatus::Empty);
    assert!(table.orders.is_empty());
    assert!(table.time_in.is_none());
    assert!(table.active_discount_rate.is_none());
    assert_eq!(table.history.len(), 1);
    assert_eq!(table.history[0].orders[0].id, order.id);

    // paid orders are out of reach of status commands
    assert!(matches!(
        manager.set_order_status(&order.id, OrderStatus::Served),
        Err(ManagerError::OrderNotFound(_))
    ));
    assert_eq!(manager.bill(1).unwrap().final_total, 0);
}

#[test]
fn test_history_newest_first() {
    let manager = create_test_manager();
    place(&manager, 1, vec![line("bia", 1)]);
    manager.checkout(1).unwrap();
    place(&manager, 1, vec![line("pho-bo", 1)]);
    manager.checkout(1).unwrap();

    let history = manager.history(1).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].bill.final_total, 45_000);
    assert_eq!(history[1].bill.final_total, 15_000);
}

#[test]
fn test_checkout_without_orders_rejected() {
    let manager = create_test_manager();
    let err = manager.checkout(6).unwrap_err();
    assert!(matches!(err, ManagerError::CheckoutWithNoOrders(6)));

    let table = manager.get_table(6).unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert!(table.history.is_empty());

    assert!(matches!(
        manager.checkout(1),
        Err(ManagerError::CheckoutWithNoOrders(1))
    ));
}

#[test]
fn test_checkout_seeded_table() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();
    let receipt = manager.checkout(2).unwrap();
    assert_eq!(receipt.entry.bill.final_total, 325_000);
    assert!(!manager.has_open_orders().unwrap());

    let events = drain_events(&mut rx);
    let names: Vec<_> = events.iter().map(|e| e.payload.name()).collect();
    assert!(names.contains(&"TABLE_CHECKED_OUT"));
    assert!(names.contains(&"TABLE_STATUS_CHANGED"));
}

// ========================================================================
// Table status
// ========================================================================

#[test]
fn test_set_table_status_rules() {
    let manager = create_test_manager();

    let table = manager.set_table_status(1, TableStatus::Occupied).unwrap();
    assert!(table.time_in.is_some());
    let stamped = table.time_in;

    // idempotent, time_in kept
    let again = manager.set_table_status(1, TableStatus::Occupied).unwrap();
    assert_eq!(again.time_in, stamped);

    let freed = manager.set_table_status(1, TableStatus::Reserved).unwrap();
    assert_eq!(freed.status, TableStatus::Reserved);
    assert!(freed.time_in.is_none());

    assert!(matches!(
        manager.set_table_status(2, TableStatus::Empty),
        Err(ManagerError::TableHasOpenOrders(2))
    ));
    assert_eq!(manager.get_table(2).unwrap().status, TableStatus::Occupied);
}

#[test]
fn test_order_on_reserved_table_occupies_it() {
    let manager = create_test_manager();
    place(&manager, 4, vec![line("nom-sua", 1)]);
    let table = manager.get_table(4).unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert!(table.time_in.is_some());
}

#[test]
fn test_second_order_keeps_time_in() {
    let manager = create_test_manager();
    place(&manager, 1, vec![line("bia", 1)]);
    let first = manager.get_table(1).unwrap().time_in;
    std::thread::sleep(std::time::Duration::from_millis(3));
    place(&manager, 1, vec![line("bia", 1)]);
    assert_eq!(manager.get_table(1).unwrap().time_in, first);
}

// ========================================================================
// Simulator ticks
// ========================================================================

#[test]
fn test_advance_orders_immediate() {
    let manager = create_test_manager();
    let order = place_standard(&manager, 1);

    // seeded order (preparing) + new order (pending)
    assert_eq!(manager.advance_orders(&ImmediateAdvancement).unwrap(), 2);
    assert_eq!(manager.advance_orders(&ImmediateAdvancement).unwrap(), 2);
    assert_eq!(manager.advance_orders(&ImmediateAdvancement).unwrap(), 1);
    assert_eq!(manager.advance_orders(&ImmediateAdvancement).unwrap(), 0);

    let table = manager.get_table(1).unwrap();
    let stored = table.orders.iter().find(|o| o.id == order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Served);
    assert_eq!(
        manager.get_table(2).unwrap().orders[0].status,
        OrderStatus::Served
    );
}

#[test]
fn test_advance_orders_random_zero_probability() {
    let manager = create_test_manager();
    place_standard(&manager, 1);
    let strategy = RandomAdvancement::seeded(0.0, 11);

    // only pending → preparing is unconditional
    assert_eq!(manager.advance_orders(&strategy).unwrap(), 1);
    for _ in 0..10 {
        assert_eq!(manager.advance_orders(&strategy).unwrap(), 0);
    }
}

#[test]
fn test_advance_never_pays() {
    struct Greedy;
    impl AdvancementStrategy for Greedy {
        fn next_status(&self, _current: OrderStatus, _elapsed: Duration) -> Option<OrderStatus> {
            Some(OrderStatus::Paid)
        }
    }

    let manager = create_test_manager();
    assert_eq!(manager.advance_orders(&Greedy).unwrap(), 0);
    assert_eq!(
        manager.get_table(2).unwrap().orders[0].status,
        OrderStatus::Preparing
    );
}

// ========================================================================
// Queries and events
// ========================================================================

#[test]
fn test_query_tables() {
    let manager = create_test_manager();
    place(&manager, 5, vec![line("lau-thai", 1)]);

    let hotpot = manager.query(&TableQuery::default().dish("lẩu")).unwrap();
    let ids: Vec<_> = hotpot.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 5]);

    let floor1 = manager
        .query(&TableQuery::default().area("Tầng 1").dish("lẩu"))
        .unwrap();
    assert_eq!(floor1.len(), 1);

    let vip = manager
        .query(&TableQuery::default().area("Tầng 3").status(TableStatus::Occupied))
        .unwrap();
    assert_eq!(vip.len(), 1);
    assert_eq!(vip[0].name, "Bàn VIP 2");

    assert!(manager
        .query(&TableQuery::default().dish("sushi"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_event_sequence_is_monotonic() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();

    let order = place_standard(&manager, 1);
    manager
        .set_order_status(&order.id, OrderStatus::Preparing)
        .unwrap();
    manager.checkout(1).unwrap();

    let events = drain_events(&mut rx);
    assert!(events.len() >= 4);
    assert!(events.windows(2).all(|w| w[0].sequence < w[1].sequence));
    assert!(events.iter().all(|e| e.table_id == 1));
    assert_eq!(events[0].payload.name(), "TABLE_STATUS_CHANGED");
    assert_eq!(events[1].payload.name(), "ORDER_PLACED");
}

#[test]
fn test_rejections_emit_nothing() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();

    let _ = manager.place_order(&session(1), &[]);
    let _ = manager.checkout(6);
    let _ = manager.set_table_status(2, TableStatus::Empty);
    let _ = manager.apply_promotion_to_all_occupied("nope");

    assert!(drain_events(&mut rx).is_empty());
}
