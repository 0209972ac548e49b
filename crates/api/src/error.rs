use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use critica_core::error::CoreError;

use crate::mailer::DeliveryError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error", "code", "field"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `critica-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The notification collaborator failed to deliver a message.
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, field, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    None,
                    format!("{entity} '{id}' not found"),
                ),
                CoreError::Validation { field, message } => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    Some(*field),
                    message.clone(),
                ),
                CoreError::Conflict { field, message } => (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    Some(*field),
                    message.clone(),
                ),
                CoreError::InvalidCredential { field, message } => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_CREDENTIAL",
                    Some(*field),
                    message.clone(),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", None, msg.clone())
                }
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", None, msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        None,
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Delivery errors ---
            AppError::Delivery(err) => {
                tracing::error!(error = %err, "Confirmation code delivery failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "DELIVERY_ERROR",
                    None,
                    "Failed to deliver the confirmation code".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", None, msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    None,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = match field {
            Some(field) => json!({ "error": message, "code": code, "field": field }),
            None => json!({ "error": message, "code": code }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, field, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (PostgreSQL error 23505) map to 409, with
///   the known `uq_*` constraint names translated to the offending field so
///   storage-layer races surface exactly like the pre-checked conflicts.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(
    err: &sqlx::Error,
) -> (StatusCode, &'static str, Option<&'static str>, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            None,
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505.
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                let (field, message) = match constraint {
                    "uq_users_username" => ("username", "This username is already taken"),
                    "uq_users_email" => ("email", "This email is already registered"),
                    "uq_categories_slug" | "uq_genres_slug" => {
                        ("slug", "This slug is already in use")
                    }
                    "uq_reviews_title_author" => {
                        ("review", "You have already reviewed this title")
                    }
                    _ => ("unknown", "Duplicate value violates a unique constraint"),
                };
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    Some(field),
                    message.to_string(),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                None,
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                None,
                "An internal error occurred".to_string(),
            )
        }
    }
}
