//! r2d2 pooling for the SQLite store.
//!
//! Both constructors migrate the schema before handing the pool out, so
//! callers never see a connection to an outdated database.

use std::sync::atomic::{AtomicU64, Ordering};

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use simulcast_common::{Error, Result};

use crate::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;

/// Open (creating if needed) the database at `db_path`.
///
/// Every connection enables foreign keys and WAL journaling.
///
/// ```no_run
/// use simulcast_db::pool::{get_conn, init_pool};
///
/// let pool = init_pool("/var/lib/simulcast/simulcast.db").unwrap();
/// let conn = get_conn(&pool).unwrap();
/// ```
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")
    });
    build(manager, db_path)
}

/// Open a private in-memory database shared by all connections of the pool.
///
/// Each call gets its own database, so parallel tests and dry runs never see
/// each other's rows.
///
/// ```
/// use simulcast_db::pool::{get_conn, init_memory_pool};
///
/// let pool = init_memory_pool().unwrap();
/// assert!(get_conn(&pool).is_ok());
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let uri = format!(
        "file:simulcast-{}-{}?mode=memory&cache=shared",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::Relaxed)
    );

    let manager = SqliteConnectionManager::file(&uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    build(manager, &uri)
}

fn build(manager: SqliteConnectionManager, label: &str) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("Cannot open pool for {label}: {e}")))?;

    let conn = get_conn(&pool)?;
    let applied = migrations::run_migrations(&conn)
        .map_err(|e| Error::database(format!("Cannot migrate {label}: {e}")))?;
    tracing::debug!(database = label, applied, "Database ready");
    drop(conn);

    Ok(pool)
}

/// Check a connection out of `pool`.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("No database connection available: {e}")))
}
