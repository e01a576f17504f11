// Authentication data models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Role stored in the user_roles table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// User database model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "owner@restaurant.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub role: Role,
}

impl UserResponse {
    pub fn new(user: User, role: Role) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            role,
        }
    }
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "owner@restaurant.com")]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Admin request to create a user account
///
/// Missing fields deserialize as empty strings so they fail validation with 400.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6))]
    pub password: String,
    /// Defaults to `user`
    pub role: Option<Role>,
}

/// Admin request to change a user's role
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Wrapper matching the `{ "user": ... }` response body
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub users: Vec<UserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
        assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(Role::default().to_string(), "user");
    }

    #[test]
    fn test_create_user_validation() {
        let request = CreateUserRequest {
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
            role: None,
        };
        assert!(request.validate().is_err());

        let request = CreateUserRequest {
            email: "staff@restaurant.com".to_string(),
            password: "123".to_string(),
            role: Some(Role::Admin),
        };
        assert!(request.validate().is_err());

        let request = CreateUserRequest {
            email: "staff@restaurant.com".to_string(),
            password: "secret123".to_string(),
            role: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_user_missing_fields_fail_validation() {
        let request: CreateUserRequest = serde_json::from_str("{}").unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_user_response_hides_password() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&UserResponse::new(user, Role::Admin)).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
