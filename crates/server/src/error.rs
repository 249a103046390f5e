//! Unified error handling for the HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for request handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or out-of-range input, caught before business logic runs.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced entity does not exist, or the caller lacks access
    /// (deliberately indistinguishable for orders).
    #[error("not found")]
    NotFound,

    /// Unique constraint violated (e.g., duplicate SKU).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Requested quantity exceeds available stock.
    #[error("out of stock: {0}")]
    OutOfStock(String),

    /// Illegal order status transition.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            e @ RepositoryError::OutOfStock { .. } => Self::OutOfStock(e.to_string()),
            e @ RepositoryError::InvalidTransition { .. } => {
                Self::InvalidTransition(e.to_string())
            }
            RepositoryError::Database(e) => Self::Database(e),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl AppError {
    const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound => "not_found",
            Self::Conflict(_) => "conflict",
            Self::OutOfStock(_) => "out_of_stock",
            Self::InvalidTransition(_) => "invalid_transition",
            Self::Database(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_)) {
            tracing::error!(error = %self, "request failed");
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::OutOfStock(_) | Self::InvalidTransition(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchline_core::{OrderStatus, VariantId};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad input".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(get_status(AppError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::Conflict("duplicate sku".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::OutOfStock("variant 1".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::InvalidTransition("pending -> shipped".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_errors_map_to_typed_failures() {
        let err: AppError = RepositoryError::OutOfStock {
            variant_id: VariantId::new(3),
            requested: 5,
            available: 2,
        }
        .into();
        assert!(matches!(err, AppError::OutOfStock(_)));
        assert_eq!(err.code(), "out_of_stock");

        let err: AppError = RepositoryError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipped,
        }
        .into();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        assert_eq!(err.code(), "invalid_transition");

        let err: AppError = RepositoryError::NotFound.into();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn test_database_errors_do_not_leak_details() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
