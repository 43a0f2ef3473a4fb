//! Error taxonomy for the order subsystem
//!
//! Services return `OrderError` and let `?` propagate it; the HTTP handlers
//! translate each kind into a wire status via [`OrderError::status_code`].
//! Messages are short and machine-oriented; user-facing formatting belongs
//! to the delivery layer.

use axum::http::StatusCode;
use sea_orm::DbErr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Malformed or missing input (empty item list, failed field validation)
    Validation(String),
    /// Structurally invalid identifier passed by the caller
    InvalidArgument(String),
    /// Referenced order or product absent, or soft-deleted
    NotFound(String),
    /// Order-id collision detected at insert time
    Conflict(String),
    /// Double soft-delete attempt
    AlreadyDeleted(String),
    /// Collaborator failure (price lookup)
    Upstream(String),
    /// Unclassified store or transaction failure
    Internal(String),
}

impl OrderError {
    /// HTTP status the delivery layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            OrderError::Validation(_) | OrderError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::Conflict(_) | OrderError::AlreadyDeleted(_) => StatusCode::CONFLICT,
            OrderError::Upstream(_) => StatusCode::BAD_GATEWAY,
            OrderError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderError::Validation(msg) => write!(f, "validation error: {}", msg),
            OrderError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            OrderError::NotFound(msg) => write!(f, "not found: {}", msg),
            OrderError::Conflict(msg) => write!(f, "conflict: {}", msg),
            OrderError::AlreadyDeleted(msg) => write!(f, "already deleted: {}", msg),
            OrderError::Upstream(msg) => write!(f, "upstream error: {}", msg),
            OrderError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for OrderError {}

impl From<DbErr> for OrderError {
    fn from(err: DbErr) -> Self {
        OrderError::Internal(err.to_string())
    }
}
