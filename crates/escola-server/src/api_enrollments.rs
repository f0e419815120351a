//! Handlers for `/matricula`.
//!
//! Enrollments have no update route. Creating one for an unknown student or
//! subject answers 409, since the store's foreign keys reject it.

use crate::api::{affected, found, run_blocking, ApiError, InsertedResponse, RowsAffectedResponse};
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use escola_db::{delete_enrollment, get_enrollment, insert_enrollment, list_enrollments};
use escola_types::{Enrollment, EnrollmentPayload, RecordId};
use std::sync::Arc;

const KIND: &str = "matricula";

/// POST /matricula
pub async fn create_enrollment_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<EnrollmentPayload>,
) -> Result<(StatusCode, Json<InsertedResponse>), ApiError> {
    let id = run_blocking(&state, move |gateway| insert_enrollment(gateway, &payload)).await?;
    Ok((StatusCode::CREATED, Json(InsertedResponse { id })))
}

/// GET /matricula
pub async fn list_enrollments_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    let enrollments = run_blocking(&state, list_enrollments).await?;
    Ok(Json(enrollments))
}

/// GET /matricula/:id
pub async fn get_enrollment_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<Enrollment>, ApiError> {
    let enrollment = run_blocking(&state, move |gateway| get_enrollment(gateway, id)).await?;
    found(enrollment, KIND, id).map(Json)
}

/// DELETE /matricula/:id
pub async fn delete_enrollment_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<RowsAffectedResponse>, ApiError> {
    let rows = run_blocking(&state, move |gateway| delete_enrollment(gateway, id)).await?;
    affected(rows, KIND, id)
}
