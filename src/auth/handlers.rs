// HTTP handlers for authentication and user management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{
    middleware::{AdminUser, AuthenticatedUser},
    models::{
        CreateUserRequest, LoginRequest, LoginResponse, UpdateRoleRequest, UserEnvelope, UserList,
        UserResponse,
    },
};
use crate::error::ApiError;
use crate::AppState;

/// Handler for POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Malformed request"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;
    let response = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

/// Handler for GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let current = state.auth.get_current_user(user.user_id).await?;
    Ok(Json(current))
}

/// Handler for GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All users with their roles", body = UserList),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<UserList>, ApiError> {
    let users = state.auth.list_users().await?;
    tracing::debug!("Listing {} users", users.len());
    Ok(Json(UserList { users }))
}

/// Handler for POST /api/admin/users
#[utoipa::path(
    post,
    path = "/api/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Missing fields or email already registered"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), ApiError> {
    request.validate()?;

    let user = state
        .auth
        .create_user(&request.email, &request.password, request.role.unwrap_or_default())
        .await?;

    tracing::info!("Admin {} created user {}", admin.user_id, user.id);
    Ok((StatusCode::CREATED, Json(UserEnvelope { user })))
}

/// Handler for PUT /api/admin/users/:id/role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated"),
        (status = 400, description = "Cannot change own role"),
        (status = 404, description = "User not found")
    ),
    security(("bearer" = [])),
    tag = "users"
)]
pub async fn update_user_role_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<Value>, ApiError> {
    if state.auth.users().find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("User", id));
    }

    state.auth.change_role(admin.user_id, id, request.role).await?;
    Ok(Json(json!({ "success": true })))
}
