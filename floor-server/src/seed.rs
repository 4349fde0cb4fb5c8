//! Initial floor data
//!
//! Loaded into an empty store on first start so the guest app and console
//! have something to show.

use shared::models::{Dish, Table, TableStatus};
use shared::order::{ItemStatus, Order, OrderItem, OrderStatus};
use shared::types::Timestamp;

/// The house menu
pub fn default_menu() -> Vec<Dish> {
    vec![
        Dish::new("pho-bo", "Phở Anh Hai", 45_000, "Món chính")
            .with_description(
                "Nước dùng ninh từ xương ống trong 24h, thịt bò tái nạm, bánh phở tươi.",
            )
            .popular(),
        Dish::new("ga-chien", "Gà Chiên Mắm Tỏi", 120_000, "Món chính")
            .with_description("Gà ta chiên giòn da, sốt nước mắm tỏi ớt.")
            .with_spicy_level(1),
        Dish::new("lau-thai", "Lẩu Thái Hải Sản", 250_000, "Lẩu")
            .with_description("Lẩu chua cay vị Thái với tôm sú, mực ống, nghêu, cá phi lê.")
            .with_spicy_level(2)
            .popular(),
        Dish::new("nom-sua", "Nộm Sứa Biển", 65_000, "Khai vị")
            .with_description("Sứa biển trộn xoài xanh, cà rốt, rau thơm."),
        Dish::new("com-chien", "Cơm Chiên Dương Châu", 50_000, "Món chính")
            .with_description("Cơm chiên tơi xốp với lạp xưởng."),
        Dish::new("bia", "Bia & Đồ Uống", 15_000, "Đồ uống")
            .with_description("Bia chai và nước ngọt các loại."),
    ]
}

/// The floor plan: three areas, nine tables
///
/// Table 2 starts with a running order, tables 6 and 9 are seated without
/// orders and table 4 is reserved.
pub fn default_tables(now: Timestamp) -> Vec<Table> {
    let mut tables = vec![
        Table::new(1, "Bàn 01", "Tầng 1"),
        Table::new(2, "Bàn 02", "Tầng 1"),
        Table::new(3, "Bàn 03", "Tầng 1"),
        Table::new(4, "Bàn 04", "Tầng 1").with_status(TableStatus::Reserved),
        Table::new(5, "Bàn 05", "Tầng 2"),
        Table::new(6, "Bàn 06", "Tầng 2")
            .with_status(TableStatus::Occupied)
            .with_time_in(now),
        Table::new(7, "Bàn 07", "Tầng 2"),
        Table::new(8, "Bàn VIP 1", "Tầng 3"),
        Table::new(9, "Bàn VIP 2", "Tầng 3")
            .with_status(TableStatus::Occupied)
            .with_time_in(now),
    ];

    let mut running = Order::new(
        "ORD-SEED-0002".to_string(),
        2,
        vec![
            OrderItem {
                dish_id: "lau-thai".to_string(),
                name: "Lẩu Thái Hải Sản".to_string(),
                unit_price: 250_000,
                quantity: 1,
                notes: "Ít cay".to_string(),
                status: ItemStatus::Cooking,
            },
            OrderItem {
                dish_id: "bia".to_string(),
                name: "Bia Hà Nội".to_string(),
                unit_price: 15_000,
                quantity: 5,
                notes: "Lạnh".to_string(),
                status: ItemStatus::Served,
            },
        ],
        now,
    );
    running.status = OrderStatus::Preparing;

    if let Some(table) = tables.iter_mut().find(|t| t.id == 2) {
        table.occupy(now);
        table.orders.push(running);
    }

    tables
}
