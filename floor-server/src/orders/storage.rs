//! Table storage
//!
//! The floor persists whole `Table` aggregates (orders and history
//! included), keyed by table id.
//!
//! # redb tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `tables` | `table_id` | JSON `Table` | Aggregate per table |
//! | `counters` | name | `u64` | Order number sequence |

use parking_lot::RwLock;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::Table;
use shared::types::TableId;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// key = table_id, value = JSON-serialized Table
const TABLES_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("tables");

/// key = counter name, value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const ORDER_COUNT_KEY: &str = "order_count";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence seam for table aggregates
pub trait TableStore: Send + Sync {
    fn get(&self, id: TableId) -> StorageResult<Option<Table>>;

    fn put(&self, table: &Table) -> StorageResult<()>;

    /// All tables ordered by id
    fn list(&self) -> StorageResult<Vec<Table>>;

    /// Next value of the persistent order counter (starts at 1)
    fn next_order_number(&self) -> StorageResult<u64>;

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.list()?.is_empty())
    }
}

// ============================================================================
// redb
// ============================================================================

/// Table store backed by redb
#[derive(Clone)]
pub struct RedbTableStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbTableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbTableStore").finish_non_exhaustive()
    }
}

impl RedbTableStore {
    /// Open or create the database at the given path
    ///
    /// Commits are durable once `commit()` returns.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// In-memory database (for tests)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl TableStore for RedbTableStore {
    fn get(&self, id: TableId) -> StorageResult<Option<Table>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn put(&self, value: &Table) -> StorageResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLES_TABLE)?;
            table.insert(value.id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<Table>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLES_TABLE)?;

        let mut tables = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            tables.push(serde_json::from_slice(value.value())?);
        }
        Ok(tables)
    }

    fn next_order_number(&self) -> StorageResult<u64> {
        let write_txn = self.db.begin_write()?;
        let next = {
            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            let current = counters.get(ORDER_COUNT_KEY)?.map(|v| v.value()).unwrap_or(0);
            let next = current + 1;
            counters.insert(ORDER_COUNT_KEY, next)?;
            next
        };
        write_txn.commit()?;
        Ok(next)
    }
}

// ============================================================================
// Memory
// ============================================================================

/// Table store held in process memory
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: RwLock<BTreeMap<TableId, Table>>,
    order_count: AtomicU64,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableStore for MemoryTableStore {
    fn get(&self, id: TableId) -> StorageResult<Option<Table>> {
        Ok(self.tables.read().get(&id).cloned())
    }

    fn put(&self, table: &Table) -> StorageResult<()> {
        self.tables.write().insert(table.id, table.clone());
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<Table>> {
        Ok(self.tables.read().values().cloned().collect())
    }

    fn next_order_number(&self) -> StorageResult<u64> {
        Ok(self.order_count.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::TableStatus;

    fn exercise(store: &dyn TableStore) {
        assert!(store.is_empty().unwrap());
        assert!(store.get(1).unwrap().is_none());

        store.put(&Table::new(2, "Bàn 02", "Tầng 1")).unwrap();
        store.put(&Table::new(1, "Bàn 01", "Tầng 1")).unwrap();

        let mut t = store.get(2).unwrap().unwrap();
        t.occupy(1_000);
        store.put(&t).unwrap();

        let all = store.list().unwrap();
        assert_eq!(all.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(all[1].status, TableStatus::Occupied);
        assert_eq!(all[1].time_in, Some(1_000));

        assert_eq!(store.next_order_number().unwrap(), 1);
        assert_eq!(store.next_order_number().unwrap(), 2);
    }

    #[test]
    fn test_memory_store() {
        exercise(&MemoryTableStore::new());
    }

    #[test]
    fn test_redb_in_memory_store() {
        exercise(&RedbTableStore::open_in_memory().unwrap());
    }

    #[test]
    fn test_redb_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("floor.redb");
        {
            let store = RedbTableStore::open(&path).unwrap();
            store.put(&Table::new(5, "Bàn 05", "Tầng 2")).unwrap();
            store.next_order_number().unwrap();
        }
        let store = RedbTableStore::open(&path).unwrap();
        assert_eq!(store.get(5).unwrap().unwrap().name, "Bàn 05");
        assert_eq!(store.next_order_number().unwrap(), 2);
    }
}
