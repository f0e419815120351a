//! Handlers for `/aluno`.

use crate::api::{affected, found, run_blocking, ApiError, InsertedResponse, RowsAffectedResponse};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use escola_db::{delete_student, get_student, insert_student, list_students, update_student};
use escola_types::{RecordId, Student, StudentPayload};
use std::sync::Arc;

const KIND: &str = "aluno";

/// POST /aluno
pub async fn create_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<StudentPayload>,
) -> Result<(StatusCode, Json<InsertedResponse>), ApiError> {
    let id = run_blocking(&state, move |gateway| insert_student(gateway, &payload)).await?;
    Ok((StatusCode::CREATED, Json(InsertedResponse { id })))
}

/// GET /aluno
pub async fn list_students_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let students = run_blocking(&state, list_students).await?;
    Ok(Json(students))
}

/// GET /aluno/:id
pub async fn get_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Student>, ApiError> {
    let student = run_blocking(&state, move |gateway| get_student(gateway, id)).await?;
    found(student, KIND, id).map(Json)
}

/// PUT /aluno/:id
pub async fn update_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(payload): Json<StudentPayload>,
) -> Result<Json<RowsAffectedResponse>, ApiError> {
    let rows = run_blocking(&state, move |gateway| update_student(gateway, id, &payload)).await?;
    affected(rows, KIND, id)
}

/// DELETE /aluno/:id
pub async fn delete_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<RowsAffectedResponse>, ApiError> {
    let rows = run_blocking(&state, move |gateway| delete_student(gateway, id)).await?;
    affected(rows, KIND, id)
}
