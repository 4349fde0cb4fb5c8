//! Staff notification inbox
//!
//! Newest-first list of the floor events staff act on: a dish ready for
//! pickup, an order changing status, a table paying. The inbox owns its own
//! event receiver and drains it whenever it is read, so entries appear in
//! event order without a background task. Past `capacity` the oldest entry
//! is dropped.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::order::{FloorEvent, FloorEventPayload, OrderStatus};
use shared::types::{TableId, Timestamp};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ItemReady,
    OrderUpdate,
    Checkout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub table_id: TableId,
    pub message: String,
    /// Time of the underlying floor event
    pub created_at: Timestamp,
    pub read: bool,
}

/// Inbox contents with the badge count
#[derive(Debug, Clone, Serialize)]
pub struct InboxView {
    pub unread: usize,
    pub items: Vec<Notification>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(u64),
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::NotFound(id) => {
                AppError::with_message(ErrorCode::NotFound, err.to_string())
                    .with_detail("notification_id", id)
            }
        }
    }
}

/// Staff-facing text for `event`, if staff care about it
fn describe(event: &FloorEvent) -> Option<(NotificationKind, String)> {
    let table = event.table_id;
    let described = match &event.payload {
        FloorEventPayload::ItemReady { name, .. } => (
            NotificationKind::ItemReady,
            format!("Món {name} tại Bàn {table} đã nấu xong."),
        ),
        FloorEventPayload::OrderStatusChanged {
            order_id,
            to: OrderStatus::Served,
            ..
        } => (
            NotificationKind::OrderUpdate,
            format!("Đơn #{order_id} hoàn thành"),
        ),
        FloorEventPayload::OrderStatusChanged { order_id, to, .. } => (
            NotificationKind::OrderUpdate,
            format!("Đơn #{order_id} chuyển sang {to}"),
        ),
        FloorEventPayload::TableCheckedOut {
            final_total,
            order_count,
        } => (
            NotificationKind::Checkout,
            format!("Bàn {table} đã thanh toán {final_total}đ ({order_count} đơn)"),
        ),
        _ => return None,
    };
    Some(described)
}

struct Inbox {
    rx: broadcast::Receiver<FloorEvent>,
    items: VecDeque<Notification>,
    capacity: usize,
    last_id: u64,
}

impl Inbox {
    fn drain(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.push(&event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notification inbox fell behind floor events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    fn push(&mut self, event: &FloorEvent) {
        let Some((kind, message)) = describe(event) else {
            return;
        };
        self.last_id += 1;
        self.items.push_front(Notification {
            id: self.last_id,
            kind,
            table_id: event.table_id,
            message,
            created_at: event.timestamp,
            read: false,
        });
        self.items.truncate(self.capacity);
    }

    fn unread(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}

pub struct NotificationInbox {
    inner: Mutex<Inbox>,
}

impl NotificationInbox {
    /// Inbox fed by `rx`; events sent before `rx` was subscribed are not seen
    pub fn new(rx: broadcast::Receiver<FloorEvent>, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inbox {
                rx,
                items: VecDeque::new(),
                capacity: capacity.max(1),
                last_id: 0,
            }),
        }
    }

    pub fn list(&self) -> InboxView {
        let mut inbox = self.inner.lock();
        inbox.drain();
        InboxView {
            unread: inbox.unread(),
            items: inbox.items.iter().cloned().collect(),
        }
    }

    pub fn unread_count(&self) -> usize {
        let mut inbox = self.inner.lock();
        inbox.drain();
        inbox.unread()
    }

    /// Mark one entry read; marking twice is fine
    pub fn mark_read(&self, id: u64) -> Result<Notification, NotificationError> {
        let mut inbox = self.inner.lock();
        inbox.drain();
        let notification = inbox
            .items
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NotificationError::NotFound(id))?;
        notification.read = true;
        Ok(notification.clone())
    }
}

impl fmt::Debug for NotificationInbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inbox = self.inner.lock();
        f.debug_struct("NotificationInbox")
            .field("len", &inbox.items.len())
            .field("capacity", &inbox.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::ItemStatus;

    fn event(table_id: TableId, payload: FloorEventPayload) -> FloorEvent {
        FloorEvent {
            sequence: 0,
            timestamp: 1_700_000_000_000,
            table_id,
            payload,
        }
    }

    fn item_ready(table_id: TableId, name: &str) -> FloorEvent {
        event(
            table_id,
            FloorEventPayload::ItemReady {
                order_id: "ORD-1".into(),
                item_index: 0,
                name: name.into(),
            },
        )
    }

    #[test]
    fn test_only_staff_events_are_kept() {
        let (tx, rx) = broadcast::channel(16);
        let inbox = NotificationInbox::new(rx, 10);

        tx.send(event(
            2,
            FloorEventPayload::ItemStatusChanged {
                order_id: "ORD-1".into(),
                item_index: 0,
                from: ItemStatus::Cooking,
                to: ItemStatus::Ready,
            },
        ))
        .unwrap();
        tx.send(item_ready(2, "Lẩu Thái Hải Sản")).unwrap();
        tx.send(event(
            2,
            FloorEventPayload::OrderStatusChanged {
                order_id: "ORD-1".into(),
                from: OrderStatus::Ready,
                to: OrderStatus::Served,
            },
        ))
        .unwrap();
        tx.send(event(
            2,
            FloorEventPayload::TableCheckedOut {
                final_total: 325_000,
                order_count: 1,
            },
        ))
        .unwrap();

        let view = inbox.list();
        assert_eq!(view.unread, 3);
        let messages: Vec<_> = view.items.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Bàn 2 đã thanh toán 325000đ (1 đơn)",
                "Đơn #ORD-1 hoàn thành",
                "Món Lẩu Thái Hải Sản tại Bàn 2 đã nấu xong.",
            ]
        );
        assert_eq!(view.items[2].kind, NotificationKind::ItemReady);
        assert_eq!(view.items[0].id, 3);
    }

    #[test]
    fn test_mark_read() {
        let (tx, rx) = broadcast::channel(16);
        let inbox = NotificationInbox::new(rx, 10);
        tx.send(item_ready(1, "Phở Bò")).unwrap();
        tx.send(item_ready(3, "Bia Hà Nội")).unwrap();
        assert_eq!(inbox.unread_count(), 2);

        let first = inbox.mark_read(1).unwrap();
        assert!(first.read);
        assert_eq!(first.table_id, 1);
        assert_eq!(inbox.unread_count(), 1);

        inbox.mark_read(1).unwrap();
        assert_eq!(inbox.unread_count(), 1);

        assert_eq!(inbox.mark_read(42), Err(NotificationError::NotFound(42)));
        let err: AppError = NotificationError::NotFound(42).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let (tx, rx) = broadcast::channel(64);
        let inbox = NotificationInbox::new(rx, 3);
        for i in 0..5 {
            tx.send(item_ready(1, &format!("Món {i}"))).unwrap();
        }

        let view = inbox.list();
        let ids: Vec<_> = view.items.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![5, 4, 3]);
        assert_eq!(inbox.mark_read(1), Err(NotificationError::NotFound(1)));
    }

    #[test]
    fn test_lagged_receiver_keeps_newest() {
        let (tx, rx) = broadcast::channel(2);
        let inbox = NotificationInbox::new(rx, 10);
        for i in 0..4 {
            tx.send(item_ready(1, &format!("Món {i}"))).unwrap();
        }

        let view = inbox.list();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].message, "Món Món 3 tại Bàn 1 đã nấu xong.");
    }
}
