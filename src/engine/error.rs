// Error types for the promotion engine
// Covers invalid input to the pure computations and failures of the store they read from

use crate::error::ApiError;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type for the promotion engine
///
/// Pure computations fail fast with `InvalidArgument`; filtering operations
/// treat missing references as "no match" and only surface `NotFound` when a
/// caller asked for one specific entity.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input to a pure computation
    /// (negative price, negative discount, malformed time string)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced entity does not exist in the current snapshot
    #[error("{entity} {id} not found")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// The persistence layer failed while loading a snapshot
    /// Propagated as-is, never retried here
    #[error("Upstream failure: {0}")]
    UpstreamFailure(#[from] sqlx::Error),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Engine errors render exactly like the API error they map to
impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_display() {
        let error = EngineError::invalid("price must be non-negative");
        assert_eq!(error.to_string(), "Invalid argument: price must be non-negative");

        let error = EngineError::not_found("Promotion", "abc");
        assert_eq!(error.to_string(), "Promotion abc not found");
    }

    #[test]
    fn test_error_from_sqlx() {
        let err: EngineError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, EngineError::UpstreamFailure(_)));
    }

    #[test]
    fn test_status_codes() {
        let response = EngineError::invalid("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = EngineError::not_found("Menu item", 1).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = EngineError::from(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
