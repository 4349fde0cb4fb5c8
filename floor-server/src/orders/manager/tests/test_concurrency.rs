use super::*;
use crate::orders::simulator::ImmediateAdvancement;
use std::thread;

#[test]
fn test_parallel_orders_on_one_table() {
    let manager = Arc::new(create_test_manager());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = manager.clone();
            thread::spawn(move || {
                for _ in 0..5 {
                    place(&manager, 1, vec![line("bia", 1)]);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let table = manager.get_table(1).unwrap();
    assert_eq!(table.orders.len(), 40);
    assert_eq!(manager.bill(1).unwrap().subtotal, 600_000);

    let mut ids: Vec<_> = table.orders.iter().map(|o| o.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 40);
}

#[test]
fn test_parallel_orders_across_tables() {
    let manager = Arc::new(create_test_manager());

    let handles: Vec<_> = [1, 3, 5, 7]
        .into_iter()
        .map(|table_id| {
            let manager = manager.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    place(&manager, table_id, vec![line("pho-bo", 1)]);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    for table_id in [1, 3, 5, 7] {
        assert_eq!(manager.get_table(table_id).unwrap().orders.len(), 10);
    }
}

#[test]
fn test_checkout_races_with_simulator() {
    let manager = Arc::new(create_test_manager());
    for _ in 0..5 {
        place_standard(&manager, 1);
    }

    let ticker = {
        let manager = manager.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                manager.advance_orders(&ImmediateAdvancement).unwrap();
            }
        })
    };
    let receipt = manager.checkout(1).unwrap();
    ticker.join().unwrap();

    // every order was settled exactly once and none came back to life
    assert_eq!(receipt.entry.orders.len(), 5);
    assert!(receipt.entry.orders.iter().all(|o| o.status == OrderStatus::Paid));
    let table = manager.get_table(1).unwrap();
    assert!(table.orders.is_empty());
    assert_eq!(table.status, TableStatus::Empty);
    assert_eq!(table.history.len(), 1);
}

#[test]
fn test_only_one_checkout_wins() {
    let manager = Arc::new(create_test_manager());
    place_standard(&manager, 1);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = manager.clone();
            thread::spawn(move || manager.checkout(1).is_ok())
        })
        .collect();
    let wins = handles
        .into_iter()
        .filter_map(|h| h.join().ok())
        .filter(|ok| *ok)
        .count();

    assert_eq!(wins, 1);
    assert_eq!(manager.history(1).unwrap().len(), 1);
}

#[test]
fn test_order_index_tracks_checkouts() {
    let manager = Arc::new(create_test_manager());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let manager = manager.clone();
            thread::spawn(move || {
                for _ in 0..20 {
                    if i % 2 == 0 {
                        place(&manager, 1, vec![line("bia", 1)]);
                    } else {
                        match manager.checkout(1) {
                            Ok(_) | Err(ManagerError::CheckoutWithNoOrders(_)) => {}
                            Err(e) => panic!("unexpected checkout error: {e}"),
                        }
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let open = manager.get_table(1).unwrap().orders.len();
    let indexed = manager
        .order_index
        .iter()
        .filter(|entry| *entry.value() == 1)
        .count();
    assert_eq!(indexed, open);

    let _ = manager.checkout(1);
    manager.checkout(2).unwrap();
    assert!(manager.order_index.is_empty());
    assert!(!manager.has_open_orders().unwrap());
}
