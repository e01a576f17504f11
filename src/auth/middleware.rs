// Authentication extractors for protected routes

use crate::auth::{error::AuthError, service::AuthService, token::TokenService};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::{debug, warn};
use uuid::Uuid;

/// Pull the bearer token out of the Authorization header
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

/// Authenticated user extractor for protected routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    TokenService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let endpoint = parts.uri.path().to_string();

        let token = bearer_token(parts).map_err(|e| {
            warn!("Rejected request to {}: {}", endpoint, e);
            e
        })?;

        let claims = TokenService::from_ref(state).validate_access_token(token)?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// Extractor that only admits users holding the admin role
///
/// The token is checked first (401), then the user_roles table (403).
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    TokenService: FromRef<S>,
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        let endpoint = parts.uri.path();

        if !AuthService::from_ref(state).users().is_admin(user.user_id).await? {
            warn!(
                "Authorization failed: user_id={}, endpoint={}",
                user.user_id, endpoint
            );
            return Err(AuthError::InsufficientPermissions);
        }

        debug!(
            "Authorization successful: user_id={}, endpoint={}",
            user.user_id, endpoint
        );
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::Claims;
    use axum::http::Request;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_token_service() -> TokenService {
        TokenService::new(SECRET.to_string(), 3600)
    }

    fn create_parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/api/admin/promotions")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    fn create_parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        let (parts, _) = req.into_parts();
        parts
    }

    #[tokio::test]
    async fn test_valid_token_is_accepted() {
        let service = test_token_service();
        let user_id = Uuid::new_v4();
        let token = service.generate_access_token(user_id, "owner@restaurant.com").unwrap();

        let mut parts = create_parts_with_auth(&format!("Bearer {}", token));
        let user = AuthenticatedUser::from_request_parts(&mut parts, &service)
            .await
            .unwrap();

        assert_eq!(user.user_id, user_id);
        assert_eq!(user.email, "owner@restaurant.com");
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let mut parts = create_parts_with_auth(&format!("Bearer {}", token));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_token_service()).await;

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected() {
        for value in [
            "Bearer invalid_token",
            "Bearer not.a.valid.jwt",
            "Basic dXNlcjpwYXNz",
            "bearer lowercase-scheme",
        ] {
            let mut parts = create_parts_with_auth(value);
            let result = AuthenticatedUser::from_request_parts(&mut parts, &test_token_service()).await;
            assert!(matches!(result, Err(AuthError::InvalidToken)), "{}", value);
        }
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let mut parts = create_parts_without_auth();
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_token_service()).await;

        assert!(matches!(result, Err(AuthError::MissingToken)));
    }
}
