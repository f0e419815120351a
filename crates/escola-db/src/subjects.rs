//! Statements over `tbl_disciplinas`.

use escola_types::{RecordId, Subject, SubjectPayload};
use rusqlite::Row;

use crate::gateway::{Gateway, GatewayError, Statement};

const INSERT: &str = "INSERT INTO tbl_disciplinas (nome, aulas) VALUES (?1, ?2)";
const SELECT_ALL: &str = "SELECT id, nome, aulas FROM tbl_disciplinas ORDER BY id";
const SELECT_ONE: &str = "SELECT id, nome, aulas FROM tbl_disciplinas WHERE id = ?1";
const UPDATE: &str = "UPDATE tbl_disciplinas SET nome = ?1, aulas = ?2 WHERE id = ?3";
const DELETE: &str = "DELETE FROM tbl_disciplinas WHERE id = ?1";

/// Inserts a subject and returns its generated id.
pub fn insert_subject(
    gateway: &Gateway,
    payload: &SubjectPayload,
) -> Result<RecordId, GatewayError> {
    let outcome = gateway.execute(
        &Statement::new(INSERT)
            .bind(payload.nome.clone())
            .bind(payload.aulas),
    )?;
    let id = outcome.inserted_id()?;
    tracing::info!(id, "subject inserted");
    Ok(id)
}

/// Lists every subject in id order.
pub fn list_subjects(gateway: &Gateway) -> Result<Vec<Subject>, GatewayError> {
    gateway.fetch_all(&Statement::new(SELECT_ALL), map_row_to_subject)
}

/// Fetches one subject, or `None` if the id is unknown.
pub fn get_subject(gateway: &Gateway, id: RecordId) -> Result<Option<Subject>, GatewayError> {
    gateway.fetch_one(&Statement::new(SELECT_ONE).bind(id), map_row_to_subject)
}

/// Replaces a subject's fields. Returns the number of rows affected.
pub fn update_subject(
    gateway: &Gateway,
    id: RecordId,
    payload: &SubjectPayload,
) -> Result<usize, GatewayError> {
    let outcome = gateway.execute(
        &Statement::new(UPDATE)
            .bind(payload.nome.clone())
            .bind(payload.aulas)
            .bind(id),
    )?;
    Ok(outcome.rows_affected)
}

/// Deletes a subject. Returns the number of rows affected.
pub fn delete_subject(gateway: &Gateway, id: RecordId) -> Result<usize, GatewayError> {
    let outcome = gateway.execute(&Statement::new(DELETE).bind(id))?;
    Ok(outcome.rows_affected)
}

fn map_row_to_subject(row: &Row<'_>) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        nome: row.get(1)?,
        aulas: row.get(2)?,
    })
}
