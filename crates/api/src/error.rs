use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bimfm_core::error::CoreError;
use serde_json::json;

/// Errors returned by handlers, rendered as `{"error": .., "code": ..}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Defect detection failed. Unlike other 500s, the cause is reported.
    #[error("AI analysis failed: {0}")]
    Analysis(String),

    /// Logged in full, answered with a generic message.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

type ErrorParts = (StatusCode, &'static str, String);

fn internal() -> ErrorParts {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Analysis(msg) => {
                tracing::error!(error = %msg, "AI analysis failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI_ANALYSIS_FAILED",
                    format!("AI analysis failed: {msg}"),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

/// Message for a unique constraint tripped by a racing insert.
///
/// Handlers check GUIDs, serials and inspection codes up front; these
/// only surface when two requests insert the same value concurrently.
fn unique_violation_message(constraint: &str) -> Option<&'static str> {
    match constraint {
        "uq_assets_ifc_guid" => Some("An asset with this IFC GUID already exists"),
        "uq_assets_serial_number" => Some("Serial number is already registered"),
        "uq_inspections_code" => Some("Inspection code already exists"),
        "uq_ifc_elements_ifc_guid" => Some("An IFC element with this GUID already exists"),
        _ => None,
    }
}

/// - `RowNotFound` is 404.
/// - 23505 on a `uq_*` constraint is 409.
/// - 23514 on a `ck_*` constraint (severity, condition score, status) is 400.
/// - Anything else is a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.code().as_deref() {
                Some("23505") if constraint.starts_with("uq_") => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    unique_violation_message(constraint)
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Duplicate value violates {constraint}")),
                ),
                Some("23514") if constraint.starts_with("ck_") => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value out of range ({constraint})"),
                ),
                _ => {
                    tracing::error!(error = %db_err, "Database error");
                    internal()
                }
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
