//! Shared plumbing for the record handlers.

use crate::AppState;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use escola_db::{Gateway, GatewayError};
use escola_types::RecordId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Response body for a successful insert.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertedResponse {
    /// The identifier the store generated.
    pub id: RecordId,
}

/// Response body for a successful update or delete.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowsAffectedResponse {
    pub rows_affected: usize,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Constraint violations → 409, everything else → 500. The gateway has
/// already logged the failure.
impl From<GatewayError> for ApiError {
    fn from(e: GatewayError) -> Self {
        if e.is_constraint_violation() {
            return ApiError::Conflict(e.to_string());
        }
        match e {
            GatewayError::Connection(_) => {
                ApiError::InternalServerError("database unavailable".to_string())
            }
            _ => ApiError::InternalServerError("database operation failed".to_string()),
        }
    }
}

/// Runs a gateway call on the blocking pool and maps its failure.
pub(crate) async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Gateway) -> Result<T, GatewayError> + Send + 'static,
    T: Send + 'static,
{
    let gateway = state.gateway.clone();
    tokio::task::spawn_blocking(move || f(&gateway))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "gateway task join error");
            ApiError::InternalServerError(format!("task join error: {}", e))
        })?
        .map_err(ApiError::from)
}

/// Turns an absent row into a 404.
pub(crate) fn found<T>(row: Option<T>, kind: &str, id: RecordId) -> Result<T, ApiError> {
    row.ok_or_else(|| ApiError::NotFound(format!("{} {} not found", kind, id)))
}

/// Turns a write that touched nothing into a 404.
pub(crate) fn affected(
    rows_affected: usize,
    kind: &str,
    id: RecordId,
) -> Result<Json<RowsAffectedResponse>, ApiError> {
    if rows_affected == 0 {
        tracing::debug!(kind, id, "write matched no rows");
        return Err(ApiError::NotFound(format!("{} {} not found", kind, id)));
    }
    Ok(Json(RowsAffectedResponse { rows_affected }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    #[test]
    fn zero_rows_affected_is_not_found() {
        let err = affected(0, "aluno", 9999).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "aluno 9999 not found"));
    }

    #[test]
    fn rows_affected_passes_through() {
        let Json(body) = affected(1, "aluno", 1).unwrap();
        assert_eq!(body, RowsAffectedResponse { rows_affected: 1 });
    }

    #[test]
    fn constraint_violation_maps_to_conflict() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY),
            Some("FOREIGN KEY constraint failed".to_string()),
        );
        let err = ApiError::from(GatewayError::Statement(sqlite_err));
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn other_statement_failure_maps_to_internal_error() {
        let err = ApiError::from(GatewayError::Statement(
            rusqlite::Error::InvalidColumnIndex(9),
        ));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[derive(Clone, Default)]
    struct FailureCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for FailureCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let level = *event.metadata().level();
            if level == tracing::Level::ERROR || level == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn failed_statement_is_logged_once() {
        let counter = FailureCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());

        let settings = escola_db::DbSettings {
            path: ":memory:".to_string(),
            busy_timeout_ms: 1_000,
            pool_max_size: 1,
        };
        let gateway = Gateway::connect(&settings).expect("pool should build");

        let err = tracing::subscriber::with_default(subscriber, || {
            let failure = escola_db::get_student(&gateway, 1).unwrap_err();
            ApiError::from(failure)
        });

        assert!(matches!(
            err,
            ApiError::InternalServerError(msg) if msg == "database operation failed"
        ));
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
