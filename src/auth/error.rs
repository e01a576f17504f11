// Authentication and authorization error types

use crate::error::ApiError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    // Authentication errors
    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid email or password")]
    InvalidCredentials,

    // Authorization errors
    /// Authenticated user lacks the admin role
    #[error("Insufficient permissions: admin role required")]
    InsufficientPermissions,

    // User management errors
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Admins cannot change their own role")]
    SelfRoleChange,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token generation error: {0}")]
    TokenCreation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::EmailAlreadyExists | AuthError::SelfRoleChange => StatusCode::BAD_REQUEST,
            AuthError::PasswordHash(_) | AuthError::TokenCreation(_) | AuthError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InsufficientPermissions.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::SelfRoleChange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AuthError::Database(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_matches_status_code() {
        for error in [
            AuthError::MissingToken,
            AuthError::InsufficientPermissions,
            AuthError::EmailAlreadyExists,
            AuthError::TokenCreation("bad key".to_string()),
        ] {
            let expected = error.status_code();
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
