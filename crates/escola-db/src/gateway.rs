//! Single-statement data access.
//!
//! Every call into [`Gateway`] follows the same lifecycle: take one
//! connection from the pool, run exactly one parameterized statement, commit
//! if it writes, and hand the connection back. The pooled connection and the
//! prepared statement are scoped to the call, so they are released on every
//! exit path, including errors.
//!
//! Not-found is not an error here. Reads report absence as `None` or an empty
//! `Vec`, writes report it as `rows_affected == 0`. Only connectivity and
//! statement failures become [`GatewayError`].

use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row};
use thiserror::Error;

use crate::pool::{create_pool, DbPool, DbSettings, PoolError};

/// Errors surfaced by the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No connection could be obtained from the pool.
    #[error("failed to acquire database connection: {0}")]
    Connection(#[from] r2d2::Error),

    /// The store rejected or failed the statement.
    #[error("statement failed: {0}")]
    Statement(#[from] rusqlite::Error),

    /// An insert completed without the store generating a row id.
    #[error("insert did not generate a row id")]
    NoGeneratedId,
}

impl GatewayError {
    /// Whether the store refused the statement because of a schema
    /// constraint (foreign key, `NOT NULL`, uniqueness).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            GatewayError::Statement(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ffi::ErrorCode::ConstraintViolation
        )
    }
}

/// A SQL template with positional placeholders and its bound values.
///
/// Values are always passed to the driver as parameters; the template is
/// never formatted with them.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: &'static str,
    params: Vec<Value>,
}

impl Statement {
    /// Creates a statement with no bound values.
    pub fn new(sql: &'static str) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    /// Binds the next positional value.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// The bound values, in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Whether the template is an `INSERT`, i.e. whether a generated row id
    /// is meaningful after it runs.
    pub fn is_insert(&self) -> bool {
        self.sql
            .trim_start()
            .get(..6)
            .is_some_and(|verb| verb.eq_ignore_ascii_case("insert"))
    }
}

/// Result of a write-mode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Number of rows inserted, updated or deleted.
    pub rows_affected: usize,
    /// Row id generated by an `INSERT`. `None` for other statements.
    pub last_insert_id: Option<i64>,
}

impl WriteOutcome {
    /// The generated row id of an insert.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NoGeneratedId` if the statement did not insert
    /// a row.
    pub fn inserted_id(&self) -> Result<i64, GatewayError> {
        self.last_insert_id.ok_or(GatewayError::NoGeneratedId)
    }
}

/// Mediates all store access on behalf of the HTTP handlers.
///
/// Cloning is cheap; clones share the underlying pool.
#[derive(Clone)]
pub struct Gateway {
    pool: DbPool,
}

impl Gateway {
    /// Wraps an existing pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Builds the pool from `settings` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns `PoolError` if the pool cannot be created.
    pub fn connect(settings: &DbSettings) -> Result<Self, PoolError> {
        Ok(Self::new(create_pool(settings)?))
    }

    /// The pool this gateway draws connections from.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Runs a write statement in its own transaction and commits it.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if no connection is available or the statement
    /// or commit fails. A failed statement is rolled back.
    pub fn execute(&self, statement: &Statement) -> Result<WriteOutcome, GatewayError> {
        self.run(statement, |conn| {
            let tx = conn.transaction()?;
            let rows_affected =
                tx.execute(statement.sql, params_from_iter(statement.params.iter()))?;
            let last_insert_id =
                (statement.is_insert() && rows_affected > 0).then(|| tx.last_insert_rowid());
            tx.commit()?;
            Ok(WriteOutcome {
                rows_affected,
                last_insert_id,
            })
        })
    }

    /// Runs a read statement expected to match at most one row.
    ///
    /// Returns `None` when no row matches. If several rows match, the first
    /// one in store order is returned.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if no connection is available, the statement
    /// fails, or `map` rejects the row.
    pub fn fetch_one<T, F>(
        &self,
        statement: &Statement,
        map: F,
    ) -> Result<Option<T>, GatewayError>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.run(statement, |conn| {
            let row = conn
                .query_row(statement.sql, params_from_iter(statement.params.iter()), map)
                .optional()?;
            Ok(row)
        })
    }

    /// Runs a read statement and collects every row it returns.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if no connection is available, the statement
    /// fails, or `map` rejects any row.
    pub fn fetch_all<T, F>(&self, statement: &Statement, map: F) -> Result<Vec<T>, GatewayError>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.run(statement, |conn| {
            let mut stmt = conn.prepare(statement.sql)?;
            let rows = stmt.query_map(params_from_iter(statement.params.iter()), map)?;
            let collected: rusqlite::Result<Vec<T>> = rows.collect();
            Ok(collected?)
        })
    }

    /// Acquires a connection, runs `body`, and logs any failure.
    ///
    /// This is the only place gateway failures are logged. Constraint
    /// violations are caller errors and go out at warn, everything else at
    /// error. The connection is dropped (returned to the pool) before this
    /// returns.
    fn run<T, F>(&self, statement: &Statement, body: F) -> Result<T, GatewayError>
    where
        F: FnOnce(&mut PooledConnection<SqliteConnectionManager>) -> Result<T, GatewayError>,
    {
        tracing::debug!(
            sql = statement.sql,
            params = statement.params.len(),
            "executing statement"
        );

        let result = self
            .pool
            .get()
            .map_err(GatewayError::from)
            .and_then(|mut conn| body(&mut conn));

        match &result {
            Err(e) if e.is_constraint_violation() => {
                tracing::warn!(
                    sql = statement.sql,
                    error = %e,
                    "statement rejected by constraint"
                );
            }
            Err(e) => {
                tracing::error!(
                    sql = statement.sql,
                    error = %e,
                    "statement execution failed"
                );
            }
            Ok(_) => {}
        }

        result
    }
}
