use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Local;
use rusqlite::Connection;

use crate::error::Result;
use crate::models::{NewTransaction, TransactionRecord, DATE_FORMAT};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    amount INTEGER NOT NULL,
    vendor TEXT NOT NULL,
    bank TEXT NOT NULL,
    raw_text TEXT NOT NULL DEFAULT '',
    category TEXT,
    synced INTEGER NOT NULL DEFAULT 0,
    transaction_date TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_synced ON transactions(synced);
CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(transaction_date);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Durable, append-only transaction storage. The one shared mutable
/// resource in the process; the internal mutex serializes inserts from
/// concurrent ingest workers against the read-then-update sync pass.
pub struct TransactionStore {
    conn: Mutex<Connection>,
}

impl TransactionStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = get_connection(db_path)?;
        init_db(&conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already-initialized connection (in-memory DBs in tests).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panicked holder cannot leave a half-applied write: every
        // statement here is a single SQLite operation.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert a new record with `synced = 0`. Returns the assigned rowid.
    /// This is the durability point for ingestion.
    pub fn insert(&self, tx: &NewTransaction) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO transactions (amount, vendor, bank, raw_text, synced, transaction_date, created_at) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
            rusqlite::params![
                tx.amount,
                tx.vendor,
                tx.bank,
                tx.raw_text,
                tx.transaction_date,
                Local::now().naive_local().format(DATE_FORMAT).to_string(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Flip `synced` to true and record the server-assigned category.
    /// No-op for an absent id; the flag never reverts.
    pub fn mark_synced(&self, id: i64, category: Option<&str>) -> Result<()> {
        self.conn().execute(
            "UPDATE transactions SET synced = 1, category = COALESCE(?1, category) WHERE id = ?2",
            rusqlite::params![category, id],
        )?;
        Ok(())
    }

    /// The backlog, in insertion order.
    pub fn list_unsynced(&self) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, amount, vendor, bank, raw_text, category, synced, transaction_date, created_at \
             FROM transactions WHERE synced = 0 ORDER BY id",
        )?;
        let records = stmt
            .query_map([], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Records whose transaction date falls in `[from, to]`, newest first.
    /// Bounds are ISO date-time strings; text comparison matches
    /// chronological order for this format.
    pub fn by_date_range(&self, from: &str, to: &str) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, amount, vendor, bank, raw_text, category, synced, transaction_date, created_at \
             FROM transactions WHERE transaction_date BETWEEN ?1 AND ?2 ORDER BY transaction_date DESC",
        )?;
        let records = stmt
            .query_map([from, to], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn sum_by_date_range(&self, from: &str, to: &str) -> Result<i64> {
        let sum: Option<i64> = self.conn().query_row(
            "SELECT SUM(amount) FROM transactions WHERE transaction_date BETWEEN ?1 AND ?2",
            [from, to],
            |r| r.get(0),
        )?;
        Ok(sum.unwrap_or(0))
    }

    pub fn count(&self) -> Result<i64> {
        let n = self
            .conn()
            .query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        Ok(n)
    }

    pub fn count_unsynced(&self) -> Result<i64> {
        let n = self.conn().query_row(
            "SELECT count(*) FROM transactions WHERE synced = 0",
            [],
            |r| r.get(0),
        )?;
        Ok(n)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TransactionRecord> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        amount: row.get(1)?,
        vendor: row.get(2)?,
        bank: row.get(3)?,
        raw_text: row.get(4)?,
        category: row.get(5)?,
        synced: row.get::<_, i64>(6)? != 0,
        transaction_date: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, TransactionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::open(&dir.path().join("test.db")).unwrap();
        (dir, store)
    }

    fn sample(vendor: &str, amount: i64) -> NewTransaction {
        NewTransaction {
            amount,
            vendor: vendor.to_string(),
            bank: "신한은행".to_string(),
            raw_text: format!("{vendor} {amount}원 승인"),
            transaction_date: "2026-02-15T13:00:00".to_string(),
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, store) = test_store();
        init_db(&store.conn()).unwrap();
    }

    #[test]
    fn test_insert_assigns_monotonic_ids() {
        let (_dir, store) = test_store();
        let a = store.insert(&sample("스타벅스", 5000)).unwrap();
        let b = store.insert(&sample("김밥천국", 7000)).unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_insert_roundtrip_via_unsynced() {
        let (_dir, store) = test_store();
        let id = store.insert(&sample("스타벅스강남점", 15000)).unwrap();

        let unsynced = store.list_unsynced().unwrap();
        assert_eq!(unsynced.len(), 1);
        let rec = &unsynced[0];
        assert_eq!(rec.id, id);
        assert_eq!(rec.amount, 15000);
        assert_eq!(rec.vendor, "스타벅스강남점");
        assert_eq!(rec.bank, "신한은행");
        assert_eq!(rec.raw_text, "스타벅스강남점 15000원 승인");
        assert_eq!(rec.transaction_date, "2026-02-15T13:00:00");
        assert_eq!(rec.category, None);
        assert!(!rec.synced);
    }

    #[test]
    fn test_mark_synced_removes_from_backlog() {
        let (_dir, store) = test_store();
        let id = store.insert(&sample("스타벅스", 5000)).unwrap();
        store.mark_synced(id, Some("카페")).unwrap();

        assert!(store.list_unsynced().unwrap().is_empty());
        let recs = store
            .by_date_range("2026-01-01T00:00:00", "2026-12-31T23:59:59")
            .unwrap();
        assert_eq!(recs.len(), 1);
        assert!(recs[0].synced);
        assert_eq!(recs[0].category.as_deref(), Some("카페"));
    }

    #[test]
    fn test_mark_synced_absent_id_is_noop() {
        let (_dir, store) = test_store();
        store.mark_synced(999, None).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_mark_synced_without_category_keeps_existing() {
        let (_dir, store) = test_store();
        let id = store.insert(&sample("스타벅스", 5000)).unwrap();
        store.mark_synced(id, Some("카페")).unwrap();
        store.mark_synced(id, None).unwrap();
        let recs = store
            .by_date_range("2026-01-01T00:00:00", "2026-12-31T23:59:59")
            .unwrap();
        assert_eq!(recs[0].category.as_deref(), Some("카페"));
    }

    #[test]
    fn test_backlog_is_insertion_ordered() {
        let (_dir, store) = test_store();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(store.insert(&sample("가게", 1000 + i)).unwrap());
        }
        let listed: Vec<i64> = store.list_unsynced().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_date_range_query_newest_first() {
        let (_dir, store) = test_store();
        let mut jan = sample("일월가게", 1000);
        jan.transaction_date = "2026-01-10T09:00:00".to_string();
        let mut feb = sample("이월가게", 2000);
        feb.transaction_date = "2026-02-10T09:00:00".to_string();
        let mut mar = sample("삼월가게", 3000);
        mar.transaction_date = "2026-03-10T09:00:00".to_string();
        store.insert(&jan).unwrap();
        store.insert(&feb).unwrap();
        store.insert(&mar).unwrap();

        let recs = store
            .by_date_range("2026-01-01T00:00:00", "2026-02-28T23:59:59")
            .unwrap();
        let vendors: Vec<&str> = recs.iter().map(|r| r.vendor.as_str()).collect();
        assert_eq!(vendors, ["이월가게", "일월가게"]);

        let sum = store
            .sum_by_date_range("2026-01-01T00:00:00", "2026-12-31T23:59:59")
            .unwrap();
        assert_eq!(sum, 6000);
    }

    #[test]
    fn test_concurrent_inserts() {
        let (_dir, store) = test_store();
        let store = std::sync::Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                store.insert(&sample("동시가게", 100 + i)).unwrap()
            }));
        }
        let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(store.count_unsynced().unwrap(), 8);
    }
}
