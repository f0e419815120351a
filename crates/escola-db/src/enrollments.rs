//! Statements over `tbl_matriculas`.
//!
//! Enrollments are created and removed but never edited. Both foreign keys
//! are enforced by the store; an unknown student or subject comes back as a
//! constraint violation from the gateway.

use escola_types::{Enrollment, EnrollmentPayload, RecordId};
use rusqlite::Row;

use crate::gateway::{Gateway, GatewayError, Statement};

const INSERT: &str = "INSERT INTO tbl_matriculas (id_aluno, id_disciplina) VALUES (?1, ?2)";
const SELECT_ALL: &str = "SELECT id, id_aluno, id_disciplina FROM tbl_matriculas ORDER BY id";
const SELECT_ONE: &str = "SELECT id, id_aluno, id_disciplina FROM tbl_matriculas WHERE id = ?1";
const DELETE: &str = "DELETE FROM tbl_matriculas WHERE id = ?1";

/// Inserts an enrollment and returns its generated id.
pub fn insert_enrollment(
    gateway: &Gateway,
    payload: &EnrollmentPayload,
) -> Result<RecordId, GatewayError> {
    let outcome = gateway.execute(
        &Statement::new(INSERT)
            .bind(payload.id_aluno)
            .bind(payload.id_disciplina),
    )?;
    let id = outcome.inserted_id()?;
    tracing::info!(
        id,
        id_aluno = payload.id_aluno,
        id_disciplina = payload.id_disciplina,
        "enrollment inserted"
    );
    Ok(id)
}

/// Lists every enrollment in id order.
pub fn list_enrollments(gateway: &Gateway) -> Result<Vec<Enrollment>, GatewayError> {
    gateway.fetch_all(&Statement::new(SELECT_ALL), map_row_to_enrollment)
}

/// Fetches one enrollment, or `None` if the id is unknown.
pub fn get_enrollment(
    gateway: &Gateway,
    id: RecordId,
) -> Result<Option<Enrollment>, GatewayError> {
    gateway.fetch_one(&Statement::new(SELECT_ONE).bind(id), map_row_to_enrollment)
}

/// Deletes an enrollment. Returns the number of rows affected.
pub fn delete_enrollment(gateway: &Gateway, id: RecordId) -> Result<usize, GatewayError> {
    let outcome = gateway.execute(&Statement::new(DELETE).bind(id))?;
    Ok(outcome.rows_affected)
}

fn map_row_to_enrollment(row: &Row<'_>) -> rusqlite::Result<Enrollment> {
    Ok(Enrollment {
        id: row.get(0)?,
        id_aluno: row.get(1)?,
        id_disciplina: row.get(2)?,
    })
}
