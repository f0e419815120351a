//! Statements over `tbl_alunos`.

use escola_types::{RecordId, Student, StudentPayload};
use rusqlite::Row;

use crate::gateway::{Gateway, GatewayError, Statement};

const INSERT: &str = "INSERT INTO tbl_alunos (nome, cpf, idade) VALUES (?1, ?2, ?3)";
const SELECT_ALL: &str = "SELECT id, nome, cpf, idade FROM tbl_alunos ORDER BY id";
const SELECT_ONE: &str = "SELECT id, nome, cpf, idade FROM tbl_alunos WHERE id = ?1";
const UPDATE: &str = "UPDATE tbl_alunos SET nome = ?1, cpf = ?2, idade = ?3 WHERE id = ?4";
const DELETE: &str = "DELETE FROM tbl_alunos WHERE id = ?1";

/// Inserts a student and returns its generated id.
pub fn insert_student(
    gateway: &Gateway,
    payload: &StudentPayload,
) -> Result<RecordId, GatewayError> {
    let outcome = gateway.execute(
        &Statement::new(INSERT)
            .bind(payload.nome.clone())
            .bind(payload.cpf.clone())
            .bind(payload.idade),
    )?;
    let id = outcome.inserted_id()?;
    tracing::info!(id, "student inserted");
    Ok(id)
}

/// Lists every student in id order.
pub fn list_students(gateway: &Gateway) -> Result<Vec<Student>, GatewayError> {
    gateway.fetch_all(&Statement::new(SELECT_ALL), map_row_to_student)
}

/// Fetches one student, or `None` if the id is unknown.
pub fn get_student(gateway: &Gateway, id: RecordId) -> Result<Option<Student>, GatewayError> {
    gateway.fetch_one(&Statement::new(SELECT_ONE).bind(id), map_row_to_student)
}

/// Replaces a student's fields. Returns the number of rows affected, which is
/// zero when the id is unknown.
pub fn update_student(
    gateway: &Gateway,
    id: RecordId,
    payload: &StudentPayload,
) -> Result<usize, GatewayError> {
    let outcome = gateway.execute(
        &Statement::new(UPDATE)
            .bind(payload.nome.clone())
            .bind(payload.cpf.clone())
            .bind(payload.idade)
            .bind(id),
    )?;
    Ok(outcome.rows_affected)
}

/// Deletes a student. Returns the number of rows affected.
pub fn delete_student(gateway: &Gateway, id: RecordId) -> Result<usize, GatewayError> {
    let outcome = gateway.execute(&Statement::new(DELETE).bind(id))?;
    Ok(outcome.rows_affected)
}

fn map_row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        nome: row.get(1)?,
        cpf: row.get(2)?,
        idade: row.get(3)?,
    })
}
