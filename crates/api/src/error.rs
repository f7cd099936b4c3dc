use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use castline_core::error::CoreError;
use serde::Serialize;

const HIDDEN: &str = "An internal error occurred";

/// Error returned by every handler.
///
/// Domain failures arrive as [`CoreError`]; database failures are
/// classified by constraint name so duplicate codes, dangling references
/// and failed checks reach the client as 409/400 instead of 500.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input caught before it reaches the domain layer.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Lookup by a natural key (casting code, email) found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Status, code and client-facing message for one error.
struct Rendered {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Rendered {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn hidden(detail: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Request failed with an internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", HIDDEN)
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Conflict(_) => StatusCode::CONFLICT,
        CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    fn render(&self) -> Rendered {
        match self {
            AppError::Core(core) if core.is_public() => {
                Rendered::new(core_status(core), core.code(), core.to_string())
            }
            AppError::Core(core) => Rendered::hidden(core),
            AppError::Database(err) => render_sqlx(err),
            AppError::BadRequest(msg) => {
                Rendered::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.as_str())
            }
            AppError::NotFound(msg) => {
                Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", msg.as_str())
            }
            AppError::InternalError(msg) => Rendered::hidden(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rendered = self.render();
        let body = ErrorBody {
            error: rendered.message,
            code: rendered.code,
        };
        (rendered.status, Json(body)).into_response()
    }
}

/// Constraint-named database failures that are the caller's fault.
///
/// Only constraints following the `uq_`/`fk_`/`ck_` naming convention are
/// surfaced; anything else is treated as a server fault.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return Rendered::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => db_err,
        other => return Rendered::hidden(other),
    };

    let constraint = db_err.constraint().unwrap_or_default();
    let sqlstate = db_err.code();
    match (sqlstate.as_deref(), constraint.split_once('_')) {
        (Some("23505"), Some(("uq", _))) => Rendered::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        (Some("23503"), Some(("fk", _))) if db_err.message().contains("update or delete") => {
            Rendered::new(
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Record is still referenced: {constraint}"),
            )
        }
        (Some("23503"), Some(("fk", _))) => Rendered::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Referenced record does not exist: {constraint}"),
        ),
        (Some("23514"), Some(("ck", _))) => Rendered::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value violates check constraint: {constraint}"),
        ),
        _ => Rendered::hidden(db_err),
    }
}
