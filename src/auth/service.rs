// Authentication service - business logic layer

use crate::auth::{
    error::AuthError,
    models::{LoginResponse, Role, UserResponse},
    password::PasswordService,
    repository::UserRepository,
    token::TokenService,
};
use uuid::Uuid;

/// Authentication service coordinating login, identity and user management
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_service: TokenService,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, token_service: TokenService) -> Self {
        Self {
            user_repo,
            token_service,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.token_service
    }

    pub fn users(&self) -> &UserRepository {
        &self.user_repo
    }

    /// Verify credentials and issue an access token
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password_hash)? {
            tracing::warn!("Failed login attempt for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.token_service.generate_access_token(user.id, &user.email)?;
        let role = self.user_repo.role_of(user.id).await?;

        tracing::info!("User {} logged in", user.id);
        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_service.ttl_secs(),
            user: UserResponse::new(user, role),
        })
    }

    /// Current user with role, `InvalidToken` when the account is gone
    pub async fn get_current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        let role = self.user_repo.role_of(user.id).await?;

        Ok(UserResponse::new(user, role))
    }

    /// Create an account on behalf of an admin
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserResponse, AuthError> {
        let password_hash = PasswordService::hash_password(password)?;
        let user = self.user_repo.create_user(email, &password_hash, role).await?;

        tracing::info!("Created user {} with role {}", user.id, role);
        Ok(UserResponse::new(user, role))
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AuthError> {
        self.user_repo.list_with_roles().await
    }

    /// Change another user's role; admins cannot demote themselves
    pub async fn change_role(
        &self,
        acting_user: Uuid,
        target_user: Uuid,
        role: Role,
    ) -> Result<(), AuthError> {
        if acting_user == target_user {
            return Err(AuthError::SelfRoleChange);
        }

        self.user_repo.set_role(target_user, role).await?;
        tracing::info!("User {} set role of {} to {}", acting_user, target_user, role);
        Ok(())
    }

    /// Make sure the configured bootstrap admin exists
    ///
    /// An existing account is promoted to admin; its password is left alone.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AuthError> {
        match self.user_repo.find_by_email(email).await? {
            Some(user) => {
                self.user_repo.set_role(user.id, Role::Admin).await?;
                tracing::info!("Bootstrap admin {} already exists", email);
            }
            None => {
                self.create_user(email, password, Role::Admin).await?;
                tracing::info!("Created bootstrap admin {}", email);
            }
        }
        Ok(())
    }
}
