//! Connection pool creation and configuration.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

/// Immutable settings for reaching the store.
///
/// Built once at startup and handed to [`create_pool`]; nothing reads store
/// settings from global state after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    /// Path to the SQLite database file, or `:memory:`.
    ///
    /// Every `:memory:` connection is its own empty database, so the pool is
    /// capped at one connection for that path whatever `pool_max_size` says.
    pub path: String,

    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            path: "db_escola.db".to_string(),
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors that can occur when creating the database pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Failed to build the connection pool.
    #[error("failed to create database connection pool: {0}")]
    PoolInit(#[from] r2d2::Error),
}

/// In-memory store path.
const MEMORY_PATH: &str = ":memory:";

impl DbSettings {
    /// Pool size actually used: one connection for `:memory:`, otherwise
    /// `pool_max_size`.
    fn effective_pool_size(&self) -> u32 {
        if self.path == MEMORY_PATH {
            1
        } else {
            self.pool_max_size
        }
    }
}

/// Creates a new SQLite connection pool with WAL mode and foreign keys enabled.
///
/// Every connection handed out by the pool enforces foreign keys, so
/// enrollment rows pointing at unknown students or subjects are rejected by
/// the store itself.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if the connection pool cannot be created.
pub fn create_pool(settings: &DbSettings) -> Result<DbPool, PoolError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let busy_timeout_ms = settings.busy_timeout_ms;
    let manager = SqliteConnectionManager::file(&settings.path)
        .with_flags(flags)
        .with_init(move |conn| {
            // In-memory databases report "memory" instead of "wal".
            let journal_mode: String =
                conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            if journal_mode != "wal" && journal_mode != "memory" {
                return Err(rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                    Some(format!(
                        "failed to set WAL journal mode, got: {}",
                        journal_mode
                    )),
                ));
            }
            conn.execute_batch(&format!(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = {};",
                busy_timeout_ms
            ))
        });

    let pool_max_size = settings.effective_pool_size();
    if pool_max_size != settings.pool_max_size {
        tracing::debug!(
            requested = settings.pool_max_size,
            "in-memory store, pool capped at one connection"
        );
    }

    let pool = Pool::builder().max_size(pool_max_size).build(manager)?;

    tracing::debug!(
        path = %settings.path,
        pool_max_size,
        "database pool ready"
    );

    Ok(pool)
}
