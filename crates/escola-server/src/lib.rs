//! Escola server library logic.

pub mod api;
pub mod api_enrollments;
pub mod api_students;
pub mod api_subjects;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use escola_db::Gateway;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Single-statement access to the store.
    pub gateway: Gateway,
}

/// Maximum request body size (64 KiB). Record payloads are a handful of fields.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/aluno",
            post(api_students::create_student_handler).get(api_students::list_students_handler),
        )
        .route(
            "/aluno/{id}",
            get(api_students::get_student_handler)
                .put(api_students::update_student_handler)
                .delete(api_students::delete_student_handler),
        )
        .route(
            "/disciplina",
            post(api_subjects::create_subject_handler).get(api_subjects::list_subjects_handler),
        )
        .route(
            "/disciplina/{id}",
            get(api_subjects::get_subject_handler)
                .put(api_subjects::update_subject_handler)
                .delete(api_subjects::delete_subject_handler),
        )
        .route(
            "/matricula",
            post(api_enrollments::create_enrollment_handler)
                .get(api_enrollments::list_enrollments_handler),
        )
        .route(
            "/matricula/{id}",
            get(api_enrollments::get_enrollment_handler)
                .delete(api_enrollments::delete_enrollment_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
