//! Embedded schema bootstrap.
//!
//! Production stores are expected to carry the schema already. For local
//! development and tests the three tables can be created from the embedded
//! SQL file, which only uses `IF NOT EXISTS` and is safe to apply repeatedly.

use rusqlite::Connection;
use thiserror::Error;

const SCHEMA: &str = include_str!("sql/schema.sql");

/// Tables the record statements rely on.
const TABLES: [&str; 3] = ["tbl_alunos", "tbl_disciplinas", "tbl_matriculas"];

/// Errors that can occur while bootstrapping the schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema batch failed to apply.
    #[error("failed to apply schema: {0}")]
    Apply(rusqlite::Error),

    /// Failed to inspect the store's catalog.
    #[error("failed to inspect schema: {0}")]
    Inspect(rusqlite::Error),
}

/// Creates any missing tables and indexes.
///
/// The batch is applied on every call so indexes are restored even when all
/// tables exist. Returns the number of tables that did not exist before the
/// call.
///
/// # Errors
///
/// Returns `SchemaError` if the catalog cannot be read or the schema batch
/// fails.
pub fn ensure_schema(conn: &Connection) -> Result<usize, SchemaError> {
    let missing = missing_tables(conn)?;

    if missing.is_empty() {
        tracing::debug!("tables already present, reapplying indexes");
    } else {
        tracing::info!(tables = ?missing, "creating missing tables");
    }

    let tx = conn.unchecked_transaction().map_err(SchemaError::Apply)?;
    tx.execute_batch(SCHEMA).map_err(SchemaError::Apply)?;
    tx.commit().map_err(SchemaError::Apply)?;

    Ok(missing.len())
}

/// Lists the expected tables that are absent from the store.
pub fn missing_tables(conn: &Connection) -> Result<Vec<&'static str>, SchemaError> {
    let mut missing = Vec::new();
    for table in TABLES {
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [table],
                |row| row.get(0),
            )
            .map_err(SchemaError::Inspect)?;
        if !exists {
            missing.push(table);
        }
    }
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_schema_on_fresh_db() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        let created = ensure_schema(&conn).expect("schema should apply");
        assert_eq!(created, 3);
        assert!(missing_tables(&conn).unwrap().is_empty());
    }

    #[test]
    fn ensure_schema_idempotent() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");

        let first = ensure_schema(&conn).expect("first run should succeed");
        assert_eq!(first, 3);

        let second = ensure_schema(&conn).expect("second run should succeed");
        assert_eq!(second, 0, "no tables left to create");
    }

    #[test]
    fn ensure_schema_fills_partial_store() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        conn.execute_batch(
            "CREATE TABLE tbl_alunos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nome TEXT NOT NULL,
                cpf TEXT NOT NULL,
                idade INTEGER NOT NULL
            );",
        )
        .unwrap();

        assert_eq!(
            missing_tables(&conn).unwrap(),
            vec!["tbl_disciplinas", "tbl_matriculas"]
        );
        let created = ensure_schema(&conn).expect("schema should apply");
        assert_eq!(created, 2);
    }

    #[test]
    fn ensure_schema_restores_dropped_index() {
        let conn = Connection::open_in_memory().expect("should open in-memory db");
        ensure_schema(&conn).expect("schema should apply");
        conn.execute_batch("DROP INDEX idx_matriculas_aluno;").unwrap();

        let created = ensure_schema(&conn).expect("second run should succeed");
        assert_eq!(created, 0, "all tables were present");

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master \
                 WHERE type = 'index' AND name = 'idx_matriculas_aluno')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists, "index should be recreated");
    }
}
