// HTTP handlers for restaurant settings

use axum::{extract::State, Json};
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::error::ApiError;
use crate::settings::models::{PublicSettings, RestaurantSettings, UpdateSettings};
use crate::AppState;

/// Handler for GET /api/public/settings
#[utoipa::path(
    get,
    path = "/api/public/settings",
    responses(
        (status = 200, description = "Restaurant settings with the current open status", body = PublicSettings)
    ),
    tag = "public"
)]
pub async fn public_settings_handler(
    State(state): State<AppState>,
) -> Result<Json<PublicSettings>, ApiError> {
    let settings = state.settings.get().await?;
    Ok(Json(PublicSettings::new(settings, state.clock.local_now())))
}

/// Handler for GET /api/admin/settings
#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Restaurant settings", body = RestaurantSettings),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "settings"
)]
pub async fn get_settings_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<RestaurantSettings>, ApiError> {
    let settings = state.settings.get().await?;
    Ok(Json(settings))
}

/// Handler for PUT /api/admin/settings
#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = UpdateSettings,
    responses(
        (status = 200, description = "Settings updated", body = RestaurantSettings),
        (status = 400, description = "Invalid colour or opening hours"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "settings"
)]
pub async fn update_settings_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<UpdateSettings>,
) -> Result<Json<RestaurantSettings>, ApiError> {
    payload.validate()?;
    let settings = state.settings.update(&payload).await?;
    Ok(Json(settings))
}
