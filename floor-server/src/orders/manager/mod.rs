//! FloorManager - the single mutation authority for tables and orders
//!
//! Every view (guest app, admin console, simulator) issues commands here
//! instead of mutating shared records.
//!
//! # Command Flow
//!
//! ```text
//! command(table_id, ...)
//!     ├─ 1. Take the per-table lock
//!     ├─ 2. Load the Table aggregate from the store
//!     ├─ 3. Validate + mutate (rejections leave the table untouched)
//!     ├─ 4. Persist the Table
//!     ├─ 5. Release the lock
//!     └─ 6. Broadcast FloorEvent(s)
//! ```
//!
//! Commands on different tables run in parallel; commands on the same table
//! (including simulator ticks and checkout) are strictly serialized.

mod error;
pub use error::*;

use super::cart::Cart;
use super::lifecycle::{check_item_transition, check_order_transition};
use super::simulator::AdvancementStrategy;
use super::storage::TableStore;
use crate::pricing::{PromotionEngine, compute_bill};
use crate::services::MenuCatalog;
use crate::tables::TableQuery;
use dashmap::DashMap;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::models::{CheckoutReceipt, HistoryEntry, Table, TableStatus};
use shared::order::{
    Bill, CartLineInput, FloorEvent, FloorEventPayload, ItemStatus, Order, OrderItem, OrderStatus,
};
use shared::types::{SessionContext, TableId, Timestamp};
use shared::util::{format_clock, now_millis};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// FloorManager
///
/// The `epoch` field is generated on each startup so clients can detect a
/// server restart and reload.
pub struct FloorManager {
    store: Arc<dyn TableStore>,
    catalog: Arc<MenuCatalog>,
    promotions: PromotionEngine,
    /// Per-table command serialization
    locks: DashMap<TableId, Arc<Mutex<()>>>,
    /// order_id → table_id for open orders
    order_index: DashMap<String, TableId>,
    event_tx: broadcast::Sender<FloorEvent>,
    sequence: AtomicU64,
    epoch: String,
}

impl std::fmt::Debug for FloorManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloorManager")
            .field("store", &"<TableStore>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("promotions", &self.promotions)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl FloorManager {
    /// Create a manager over `store`, seeding the default floor if it is empty
    pub fn new(
        store: Arc<dyn TableStore>,
        catalog: Arc<MenuCatalog>,
        promotions: PromotionEngine,
    ) -> ManagerResult<Self> {
        if store.is_empty()? {
            let tables = crate::seed::default_tables(now_millis());
            for table in &tables {
                store.put(table)?;
            }
            tracing::info!(tables = tables.len(), "Seeded default floor");
        }

        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        let manager = Self {
            store,
            catalog,
            promotions,
            locks: DashMap::new(),
            order_index: DashMap::new(),
            event_tx,
            sequence: AtomicU64::new(0),
            epoch,
        };
        manager.rebuild_order_index()?;
        tracing::info!(epoch = %manager.epoch, "FloorManager started with new epoch");
        Ok(manager)
    }

    fn rebuild_order_index(&self) -> ManagerResult<()> {
        self.order_index.clear();
        for table in self.store.list()? {
            for order in table.open_orders() {
                self.order_index.insert(order.id.clone(), table.id);
            }
        }
        Ok(())
    }

    /// Server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    pub fn catalog(&self) -> &Arc<MenuCatalog> {
        &self.catalog
    }

    pub fn promotions(&self) -> &PromotionEngine {
        &self.promotions
    }

    /// Subscribe to floor events
    pub fn subscribe(&self) -> broadcast::Receiver<FloorEvent> {
        self.event_tx.subscribe()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn table_lock(&self, table_id: TableId) -> Arc<Mutex<()>> {
        self.locks.entry(table_id).or_default().clone()
    }

    fn emit(&self, table_id: TableId, payload: FloorEventPayload) {
        let event = FloorEvent {
            sequence: self.sequence.fetch_add(1, Ordering::SeqCst) + 1,
            timestamp: now_millis(),
            table_id,
            payload,
        };
        // no subscribers is fine
        let _ = self.event_tx.send(event);
    }

    /// Point the order index at `table`'s open orders
    ///
    /// Called with the table lock held, right after the table is stored.
    fn reindex_table(&self, table: &Table) {
        self.order_index
            .retain(|id, owner| *owner != table.id || table.open_orders().any(|o| &o.id == id));
        for order in table.open_orders() {
            self.order_index.insert(order.id.clone(), table.id);
        }
    }

    /// Run `f` against one table under its lock
    ///
    /// The table is persisted and the order index refreshed only when `f`
    /// succeeds; events are broadcast after the lock is released.
    fn mutate_table<T>(
        &self,
        table_id: TableId,
        f: impl FnOnce(&mut Table, &mut Vec<FloorEventPayload>) -> ManagerResult<T>,
    ) -> ManagerResult<T> {
        let mut events = Vec::new();
        let value = {
            let lock = self.table_lock(table_id);
            let _guard = lock.lock();
            let mut table = self
                .store
                .get(table_id)?
                .ok_or(ManagerError::TableNotFound(table_id))?;
            let value = f(&mut table, &mut events)?;
            self.store.put(&table)?;
            self.reindex_table(&table);
            value
        };
        for payload in events {
            self.emit(table_id, payload);
        }
        Ok(value)
    }

    fn log_rejection(operation: &'static str, err: &ManagerError) {
        match err {
            ManagerError::Storage(e) => {
                tracing::error!(operation, error = %e, "Floor command failed");
            }
            other => tracing::warn!(operation, error = %other, "Floor command rejected"),
        }
    }

    fn next_order_id(&self, now: Timestamp) -> ManagerResult<String> {
        let n = self.store.next_order_number()?;
        let date = chrono::DateTime::from_timestamp_millis(now)
            .unwrap_or_default()
            .format("%Y%m%d");
        Ok(format!("ORD-{}-{:04}", date, n))
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Commit a guest cart as a new pending order
    ///
    /// The lines are resolved against the live catalog and merged per variant.
    /// An `empty` or `reserved` table becomes `occupied`.
    pub fn place_order(
        &self,
        session: &SessionContext,
        lines: &[CartLineInput],
    ) -> ManagerResult<Order> {
        self.place_order_inner(session, lines)
            .inspect_err(|e| Self::log_rejection("place_order", e))
    }

    fn place_order_inner(
        &self,
        session: &SessionContext,
        lines: &[CartLineInput],
    ) -> ManagerResult<Order> {
        let mut cart = Cart::new();
        for line in lines {
            let dish = self
                .catalog
                .get(&line.dish_id)
                .ok_or_else(|| ManagerError::DishNotFound(line.dish_id.clone()))?;
            cart.add_item(&dish, i64::from(line.quantity), &line.notes)?;
        }
        self.commit_cart(session, &mut cart)
    }

    /// Commit a cart; the cart is emptied only once the order is stored
    pub fn commit_cart(&self, session: &SessionContext, cart: &mut Cart) -> ManagerResult<Order> {
        if cart.is_empty() {
            return Err(ManagerError::EmptyCart);
        }
        let table_id = session.table_id;
        let now = now_millis();

        let items = cart.to_items();
        let order = self.mutate_table(table_id, |table, events| {
            if table.status != TableStatus::Occupied {
                let from = table.status;
                table.occupy(now);
                events.push(FloorEventPayload::TableStatusChanged {
                    from,
                    to: TableStatus::Occupied,
                });
            }

            // last fallible step before the store write
            let order_id = self.next_order_id(now)?;
            let order = Order::new(order_id, table_id, items, now);
            table.orders.push(order.clone());
            events.push(FloorEventPayload::OrderPlaced {
                order_id: order.id.clone(),
                total_amount: order.total_amount,
                item_count: order.item_count(),
            });
            Ok(order)
        })?;

        cart.clear();
        tracing::info!(
            tenant_id = %session.tenant_id,
            table_id,
            order_id = %order.id,
            total = order.total_amount,
            items = order.items.len(),
            "Order placed"
        );
        Ok(order)
    }

    /// Move an order forward (never to `paid`)
    pub fn set_order_status(&self, order_id: &str, status: OrderStatus) -> ManagerResult<Order> {
        self.set_order_status_inner(order_id, status)
            .inspect_err(|e| Self::log_rejection("set_order_status", e))
    }

    fn set_order_status_inner(&self, order_id: &str, status: OrderStatus) -> ManagerResult<Order> {
        let table_id = self
            .order_index
            .get(order_id)
            .map(|r| *r.value())
            .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))?;

        let order = self.mutate_table(table_id, |table, events| {
            let order = table
                .find_order_mut(order_id)
                .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))?;
            check_order_transition(order.status, status)?;
            let from = order.status;
            order.status = status;
            order.updated_at = now_millis();
            events.push(FloorEventPayload::OrderStatusChanged {
                order_id: order.id.clone(),
                from,
                to: status,
            });
            Ok(order.clone())
        })?;

        tracing::info!(table_id, order_id = %order_id, status = %status, "Order status changed");
        Ok(order)
    }

    /// Move one kitchen line forward
    ///
    /// Reaching `ready` broadcasts an `ItemReady` notification.
    pub fn update_item_status(
        &self,
        table_id: TableId,
        order_id: &str,
        item_index: usize,
        status: ItemStatus,
    ) -> ManagerResult<OrderItem> {
        self.mutate_table(table_id, |table, events| {
            let order = table
                .find_order_mut(order_id)
                .filter(|o| o.is_open())
                .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))?;
            let item = order
                .items
                .get_mut(item_index)
                .ok_or_else(|| ManagerError::ItemNotFound {
                    order_id: order_id.to_string(),
                    index: item_index,
                })?;
            check_item_transition(item.status, status)?;

            let from = item.status;
            item.status = status;
            let item = item.clone();
            order.updated_at = now_millis();

            events.push(FloorEventPayload::ItemStatusChanged {
                order_id: order_id.to_string(),
                item_index,
                from,
                to: status,
            });
            if status == ItemStatus::Ready {
                events.push(FloorEventPayload::ItemReady {
                    order_id: order_id.to_string(),
                    item_index,
                    name: item.name.clone(),
                });
            }
            Ok(item)
        })
        .inspect(|item| {
            tracing::info!(
                table_id,
                order_id = %order_id,
                item_index,
                dish = %item.name,
                status = %status,
                "Item status changed"
            );
        })
        .inspect_err(|e| Self::log_rejection("update_item_status", e))
    }

    /// One simulator tick across every table
    ///
    /// Returns the number of orders that moved.
    pub fn advance_orders(&self, strategy: &dyn AdvancementStrategy) -> ManagerResult<usize> {
        let now = now_millis();
        let mut advanced = 0;

        let candidates: Vec<TableId> = self
            .store
            .list()?
            .into_iter()
            .filter(Table::has_open_orders)
            .map(|t| t.id)
            .collect();

        for table_id in candidates {
            advanced += self.mutate_table(table_id, |table, events| {
                let mut moved = 0;
                for order in table.orders.iter_mut().filter(|o| o.is_open()) {
                    let elapsed =
                        Duration::from_millis(u64::try_from(now - order.created_at).unwrap_or(0));
                    let Some(next) = strategy.next_status(order.status, elapsed) else {
                        continue;
                    };
                    if check_order_transition(order.status, next).is_err() {
                        tracing::warn!(
                            order_id = %order.id,
                            from = %order.status,
                            to = %next,
                            "Advancement strategy proposed an illegal transition"
                        );
                        continue;
                    }
                    events.push(FloorEventPayload::OrderStatusChanged {
                        order_id: order.id.clone(),
                        from: order.status,
                        to: next,
                    });
                    order.status = next;
                    order.updated_at = now;
                    moved += 1;
                }
                Ok(moved)
            })?;
        }
        Ok(advanced)
    }

    /// True when any table holds an open order
    pub fn has_open_orders(&self) -> ManagerResult<bool> {
        Ok(!self.order_index.is_empty() || self.store.list()?.iter().any(Table::has_open_orders))
    }

    /// Admin order list across all tables, newest first
    ///
    /// Open orders and the paid orders kept in table history.
    pub fn list_orders(&self, status: Option<OrderStatus>) -> ManagerResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .store
            .list()?
            .into_iter()
            .flat_map(|t| {
                let history = t.history.into_iter().flat_map(|h| h.orders);
                t.orders.into_iter().chain(history)
            })
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(orders)
    }

    // ========================================================================
    // Tables
    // ========================================================================

    pub fn get_table(&self, table_id: TableId) -> ManagerResult<Table> {
        self.store
            .get(table_id)?
            .ok_or(ManagerError::TableNotFound(table_id))
    }

    pub fn list_tables(&self) -> ManagerResult<Vec<Table>> {
        Ok(self.store.list()?)
    }

    /// Filtered table list; no match is an empty list, not an error
    pub fn query(&self, query: &TableQuery) -> ManagerResult<Vec<Table>> {
        Ok(query.apply(self.store.list()?))
    }

    /// Closed sessions, newest first
    pub fn history(&self, table_id: TableId) -> ManagerResult<Vec<HistoryEntry>> {
        Ok(self.get_table(table_id)?.history)
    }

    /// Change occupancy
    ///
    /// `occupied` stamps `time_in` once. Leaving `occupied` is refused while
    /// open orders remain (checkout is the way out).
    pub fn set_table_status(&self, table_id: TableId, status: TableStatus) -> ManagerResult<Table> {
        self.mutate_table(table_id, |table, events| {
            let from = table.status;
            if from == status {
                return Ok(table.clone());
            }
            match status {
                TableStatus::Occupied => table.occupy(now_millis()),
                TableStatus::Empty | TableStatus::Reserved => {
                    if table.has_open_orders() {
                        return Err(ManagerError::TableHasOpenOrders(table_id));
                    }
                    table.status = status;
                    table.time_in = None;
                    table.clear_promotion();
                }
            }
            events.push(FloorEventPayload::TableStatusChanged { from, to: status });
            Ok(table.clone())
        })
        .inspect(|_| tracing::info!(table_id, status = %status, "Table status changed"))
        .inspect_err(|e| Self::log_rejection("set_table_status", e))
    }

    // ========================================================================
    // Promotions & billing
    // ========================================================================

    /// Bind a promotion code to a table
    ///
    /// An invalid code clears any previously active promotion on the table
    /// and is then reported as `InvalidPromotionCode`.
    pub fn apply_promotion(&self, table_id: TableId, code: &str) -> ManagerResult<Decimal> {
        match self.promotions.validate_detailed(code) {
            Some(valid) => {
                let rate = valid.rate;
                self.mutate_table(table_id, |table, events| {
                    table.set_promotion(valid.code.clone(), rate);
                    events.push(FloorEventPayload::PromotionApplied {
                        code: valid.code.clone(),
                        rate,
                    });
                    Ok(())
                })
                .inspect_err(|e| Self::log_rejection("apply_promotion", e))?;
                tracing::info!(table_id, code = %valid.code, rate = %rate, "Promotion applied");
                Ok(rate)
            }
            None => {
                let rejected = crate::pricing::promotion::normalize(code);
                self.mutate_table(table_id, |table, events| {
                    if table.active_discount_rate.is_some() || table.active_discount_code.is_some()
                    {
                        table.clear_promotion();
                        events.push(FloorEventPayload::PromotionCleared {
                            rejected_code: rejected.clone(),
                        });
                    }
                    Ok(())
                })
                .inspect_err(|e| Self::log_rejection("apply_promotion", e))?;
                let err = ManagerError::InvalidPromotionCode(rejected);
                Self::log_rejection("apply_promotion", &err);
                Err(err)
            }
        }
    }

    /// Apply one code to every occupied table holding orders
    ///
    /// Returns how many tables were updated (0 is a valid result). An invalid
    /// code is an error and touches nothing.
    pub fn apply_promotion_to_all_occupied(&self, code: &str) -> ManagerResult<usize> {
        let Some(valid) = self.promotions.validate_detailed(code) else {
            let err = ManagerError::InvalidPromotionCode(crate::pricing::promotion::normalize(code));
            Self::log_rejection("apply_promotion_to_all_occupied", &err);
            return Err(err);
        };

        let ids: Vec<TableId> = self.store.list()?.into_iter().map(|t| t.id).collect();
        let mut applied = 0;
        for table_id in ids {
            let hit = self.mutate_table(table_id, |table, events| {
                if table.status != TableStatus::Occupied || !table.has_open_orders() {
                    return Ok(false);
                }
                table.set_promotion(valid.code.clone(), valid.rate);
                events.push(FloorEventPayload::PromotionApplied {
                    code: valid.code.clone(),
                    rate: valid.rate,
                });
                Ok(true)
            })?;
            if hit {
                applied += 1;
            }
        }

        tracing::info!(code = %valid.code, tables = applied, "Promotion broadcast to occupied tables");
        Ok(applied)
    }

    /// Current payable amount, recomputed on every call
    pub fn bill(&self, table_id: TableId) -> ManagerResult<Bill> {
        Ok(compute_bill(&self.get_table(table_id)?))
    }

    /// Settle every open order of a table
    ///
    /// Orders become `paid` and move into one new history entry (prepended).
    /// The table returns to `empty` with no promotion and no `time_in`.
    pub fn checkout(&self, table_id: TableId) -> ManagerResult<CheckoutReceipt> {
        let now = now_millis();
        let receipt = self
            .mutate_table(table_id, |table, events| {
                if !table.has_open_orders() {
                    return Err(ManagerError::CheckoutWithNoOrders(table_id));
                }

                let bill = compute_bill(table);
                let mut settled: Vec<Order> = std::mem::take(&mut table.orders)
                    .into_iter()
                    .filter(Order::is_open)
                    .collect();
                for order in &mut settled {
                    order.status = OrderStatus::Paid;
                    order.updated_at = now;
                }
                let lines: usize = settled.iter().map(|o| o.items.len()).sum();

                let entry = HistoryEntry {
                    time: format!(
                        "{} - {}",
                        table.time_in.map(format_clock).unwrap_or_else(|| "--:--".into()),
                        format_clock(now)
                    ),
                    info: format!("Thanh toán: {}đ ({} món)", bill.final_total, lines),
                    time_in: table.time_in,
                    closed_at: now,
                    discount_code: table.active_discount_code.clone(),
                    bill,
                    orders: settled,
                };
                table.history.insert(0, entry.clone());

                let from = table.status;
                table.status = TableStatus::Empty;
                table.time_in = None;
                table.clear_promotion();

                events.push(FloorEventPayload::TableCheckedOut {
                    final_total: bill.final_total,
                    order_count: entry.orders.len(),
                });
                if from != TableStatus::Empty {
                    events.push(FloorEventPayload::TableStatusChanged {
                        from,
                        to: TableStatus::Empty,
                    });
                }

                Ok(CheckoutReceipt {
                    table_id,
                    table_name: table.name.clone(),
                    entry,
                })
            })
            .inspect_err(|e| Self::log_rejection("checkout", e))?;

        tracing::info!(
            table_id,
            final_total = receipt.entry.bill.final_total,
            discount = receipt.entry.bill.discount_amount,
            orders = receipt.entry.orders.len(),
            "Table checked out"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests;
