//! Handlers for `/disciplina`.

use crate::api::{affected, found, run_blocking, ApiError, InsertedResponse, RowsAffectedResponse};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use escola_db::{delete_subject, get_subject, insert_subject, list_subjects, update_subject};
use escola_types::{RecordId, Subject, SubjectPayload};
use std::sync::Arc;

const KIND: &str = "disciplina";

/// POST /disciplina
pub async fn create_subject_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<SubjectPayload>,
) -> Result<(StatusCode, Json<InsertedResponse>), ApiError> {
    let id = run_blocking(&state, move |gateway| insert_subject(gateway, &payload)).await?;
    Ok((StatusCode::CREATED, Json(InsertedResponse { id })))
}

/// GET /disciplina
pub async fn list_subjects_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Subject>>, ApiError> {
    let subjects = run_blocking(&state, list_subjects).await?;
    Ok(Json(subjects))
}

/// GET /disciplina/:id
pub async fn get_subject_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Subject>, ApiError> {
    let subject = run_blocking(&state, move |gateway| get_subject(gateway, id)).await?;
    found(subject, KIND, id).map(Json)
}

/// PUT /disciplina/:id
pub async fn update_subject_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(payload): Json<SubjectPayload>,
) -> Result<Json<RowsAffectedResponse>, ApiError> {
    let rows = run_blocking(&state, move |gateway| update_subject(gateway, id, &payload)).await?;
    affected(rows, KIND, id)
}

/// DELETE /disciplina/:id
pub async fn delete_subject_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<RowsAffectedResponse>, ApiError> {
    let rows = run_blocking(&state, move |gateway| delete_subject(gateway, id)).await?;
    affected(rows, KIND, id)
}
