//! SQLite connection pooling for the catalog database.
//!
//! Both the file-backed and the in-memory pool go through [`build`], which
//! sizes the pool, checks out one connection, and brings the schema up to
//! date before handing the pool back.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use catalog_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Writers are serialized by the store, so a few readers are plenty.
const MAX_CONNECTIONS: u32 = 4;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) the database file at `db_path`.
///
/// Every connection gets a busy timeout and WAL journaling.
pub fn init_pool(db_path: impl AsRef<Path>) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path.as_ref()).with_init(|conn| {
        configure(conn)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))
    });
    build(manager)
}

/// A private in-memory database; every call gets a fresh one.
///
/// The URI names a shared cache so the pool's connections all see the same
/// data, and the counter keeps concurrently running tests apart.
pub fn init_memory_pool() -> Result<DbPool> {
    static NEXT_DB: AtomicU64 = AtomicU64::new(0);
    let uri = format!(
        "file:catalog_memdb_{}?mode=memory&cache=shared",
        NEXT_DB.fetch_add(1, Ordering::Relaxed)
    );
    build(SqliteConnectionManager::file(uri).with_init(configure))
}

/// Check a connection out of `pool`.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("No database connection available: {e}")))
}

fn configure(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(BUSY_TIMEOUT)
}

fn build(manager: SqliteConnectionManager) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(MAX_CONNECTIONS)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to open catalog database: {e}")))?;

    migrations::run_migrations(&*get_conn(&pool)?)?;
    Ok(pool)
}
