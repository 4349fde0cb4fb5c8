use super::*;
use crate::orders::storage::MemoryTableStore;
use crate::pricing::promotion::DEFAULT_TABLE_MAX_PERCENT;
use shared::error::ErrorCode;
use shared::order::MAX_LINE_QUANTITY;

fn create_test_manager() -> FloorManager {
    FloorManager::new(
        Arc::new(MemoryTableStore::new()),
        Arc::new(MenuCatalog::default()),
        PromotionEngine::for_tables(DEFAULT_TABLE_MAX_PERCENT),
    )
    .unwrap()
}

fn session(table_id: TableId) -> SessionContext {
    SessionContext::new("tenant-test", table_id)
}

fn line(dish_id: &str, quantity: i32) -> CartLineInput {
    CartLineInput {
        dish_id: dish_id.to_string(),
        quantity,
        notes: String::new(),
    }
}

fn line_with_notes(dish_id: &str, quantity: i32, notes: &str) -> CartLineInput {
    CartLineInput {
        dish_id: dish_id.to_string(),
        quantity,
        notes: notes.to_string(),
    }
}

// ========================================================================
// Helper: place an order and return it
// ========================================================================

fn place(manager: &FloorManager, table_id: TableId, lines: Vec<CartLineInput>) -> Order {
    manager
        .place_order(&session(table_id), &lines)
        .expect("place_order failed")
}

/// Pho ×2 + Bia ×5 = 165_000
fn place_standard(manager: &FloorManager, table_id: TableId) -> Order {
    place(manager, table_id, vec![line("pho-bo", 2), line("bia", 5)])
}

fn drain_events(rx: &mut broadcast::Receiver<FloorEvent>) -> Vec<FloorEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

mod test_flows;
mod test_concurrency;
