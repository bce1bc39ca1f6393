use std::sync::Arc;

use anyhow::Result;
use duckdb::Connection;
use tokio::sync::Mutex;
use tracing::info;

use crate::schema::init_sql;

/// A DuckDB backend for the repair-shop reports.
///
/// The analytics layer never writes, but DuckDB connections are not `Sync`,
/// so the connection lives behind `Arc<Mutex<_>>`. Concurrent report queries
/// queue on the lock and each holds it for a single bounded read.
///
/// Memory and thread limits are enforced by [`init_sql`] at open time.
pub struct DuckDbBackend {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl DuckDbBackend {
    /// Open (or create) a DuckDB database file at `path`.
    ///
    /// `memory_limit` is a DuckDB size string such as `"1GB"` or `"512MB"`.
    /// Tables are created if they do not already exist.
    pub fn open(path: &str, memory_limit: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(&init_sql(memory_limit))?;
        info!(
            "DuckDB opened at {} with memory_limit={}, threads=2",
            path, memory_limit
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an **in-memory** DuckDB database.
    ///
    /// Intended for tests only; data is discarded when the struct is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&init_sql("1GB"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Liveness check for `/health`: fails when the connection is gone or
    /// the ticket table the reports read from is missing.
    pub async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("SELECT 1 FROM tickets LIMIT 1")?;
        Ok(())
    }

    /// Acquire the DuckDB connection lock for direct statements.
    ///
    /// Intended for integration tests that need raw SQL. Production code
    /// should use the typed query methods.
    pub async fn conn_for_test(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
