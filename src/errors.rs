use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Set once at startup; when true, 5xx bodies carry debugging detail.
static EXPOSE_INTERNALS: OnceLock<bool> = OnceLock::new();

/// Enable `details`/`stack` on internal errors (development mode only).
pub fn expose_internals(enabled: bool) {
    let _ = EXPOSE_INTERNALS.set(enabled);
}

fn internals_exposed() -> bool {
    EXPOSE_INTERNALS.get().copied().unwrap_or(false)
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    /// The generative model failed or returned something we could not decode.
    #[error("{context}: {detail}")]
    Upstream { context: String, detail: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn upstream(context: impl Into<String>, detail: impl ToString) -> Self {
        AppError::Upstream {
            context: context.into(),
            detail: detail.to_string(),
        }
    }
}

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    #[schema(example = "amount is required")]
    pub error: String,
    /// Underlying cause, when one is worth showing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Debug rendering of the error (development mode only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let expose = internals_exposed();
        let body = match self {
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => ErrorResponse {
                error: msg.clone(),
                details: None,
                stack: None,
            },
            AppError::Upstream { context, detail } => {
                error!("Upstream error: {context}: {detail}");
                ErrorResponse {
                    error: context.clone(),
                    details: Some(detail.clone()),
                    stack: expose.then(|| format!("{self:?}")),
                }
            }
            AppError::Internal(msg) => {
                // Log the actual error, only echo it back in development
                error!("Internal error: {msg}");
                ErrorResponse {
                    error: "An internal error occurred".to_string(),
                    details: expose.then(|| msg.clone()),
                    stack: expose.then(|| format!("{self:?}")),
                }
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Resource already exists".to_string())
            }
            _ => AppError::Internal(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Malformed JSON bodies become 400s in the standard error shape.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

/// Malformed query strings become 400s in the standard error shape.
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

/// Malformed path segments (e.g. a non-UUID id) become 400s.
pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::upstream("model failed", "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_rt::test]
    async fn test_upstream_body_carries_details() {
        let resp = AppError::upstream("Failed to generate credit score", "bad json")
            .error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "Failed to generate credit score");
        assert_eq!(value["details"], "bad json");
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = AppError::from(sqlx::Error::Database(Box::new(UniqueViolation)));
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_other_database_errors_are_internal() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[actix_rt::test]
    async fn test_internal_body_hides_message() {
        let resp = AppError::Internal("connection refused".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"], "An internal error occurred");
    }
}
