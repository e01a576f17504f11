// HTTP handlers for catalog endpoints and the public menu

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::catalog::menu::build_menu;
use crate::catalog::models::{
    CreateCategory, CreateMenuItem, MenuItemQuery, MenuQuery, PublicMenu, UpdateCategory,
    UpdateMenuItem,
};
use crate::error::ApiError;
use crate::models::{Category, MenuItem};
use crate::AppState;

/// Handler for GET /api/public/menu
///
/// Active items grouped by category, each with its best live offer.
#[utoipa::path(
    get,
    path = "/api/public/menu",
    params(MenuQuery),
    responses(
        (status = 200, description = "Public menu", body = PublicMenu)
    ),
    tag = "public"
)]
pub async fn public_menu_handler(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Result<Json<PublicMenu>, ApiError> {
    let categories = state.catalog.list_categories().await?;
    let items = state
        .catalog
        .list_menu_items(&MenuItemQuery {
            active_only: Some(true),
            ..Default::default()
        })
        .await?;
    let live = state.promotions.eligible_set().await?;

    let sections = build_menu(
        &categories,
        &items,
        &live.links,
        &live.promotions,
        query.search.as_deref(),
    )?;

    tracing::debug!("Serving public menu with {} sections", sections.len());
    Ok(Json(PublicMenu { sections }))
}

/// Handler for GET /api/admin/categories
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    responses(
        (status = 200, description = "Categories by display order", body = Vec<Category>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn list_categories_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(categories))
}

/// Handler for POST /api/admin/categories
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation failed")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn create_category_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    payload.validate()?;
    let category = state.catalog.create_category(&payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Handler for PUT /api/admin/categories/{id}
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn update_category_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategory>,
) -> Result<Json<Category>, ApiError> {
    payload.validate()?;
    let category = state.catalog.update_category(id, &payload).await?;
    Ok(Json(category))
}

/// Handler for DELETE /api/admin/categories/{id}
///
/// Also deletes the category's items and their promotion links.
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn delete_category_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_category(id).await?;
    state.promotions.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/admin/menu-items
#[utoipa::path(
    get,
    path = "/api/admin/menu-items",
    params(MenuItemQuery),
    responses(
        (status = 200, description = "Menu items by name", body = Vec<MenuItem>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn list_menu_items_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<MenuItemQuery>,
) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = state.catalog.list_menu_items(&query).await?;
    Ok(Json(items))
}

/// Handler for GET /api/admin/menu-items/{id}
#[utoipa::path(
    get,
    path = "/api/admin/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Menu item", body = MenuItem),
        (status = 404, description = "Menu item not found")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn get_menu_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MenuItem>, ApiError> {
    let item = state
        .catalog
        .find_menu_item(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu item", id))?;
    Ok(Json(item))
}

/// Handler for POST /api/admin/menu-items
#[utoipa::path(
    post,
    path = "/api/admin/menu-items",
    request_body = CreateMenuItem,
    responses(
        (status = 201, description = "Menu item created", body = MenuItem),
        (status = 400, description = "Validation failed or unknown category")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn create_menu_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateMenuItem>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    payload.validate()?;
    let item = state.catalog.create_menu_item(&payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for PUT /api/admin/menu-items/{id}
#[utoipa::path(
    put,
    path = "/api/admin/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    request_body = UpdateMenuItem,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItem),
        (status = 400, description = "Validation failed or unknown category"),
        (status = 404, description = "Menu item not found")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn update_menu_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMenuItem>,
) -> Result<Json<MenuItem>, ApiError> {
    payload.validate()?;
    let item = state.catalog.update_menu_item(id, &payload).await?;
    Ok(Json(item))
}

/// Handler for DELETE /api/admin/menu-items/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 204, description = "Menu item deleted"),
        (status = 404, description = "Menu item not found")
    ),
    security(("bearer" = [])),
    tag = "catalog"
)]
pub async fn delete_menu_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete_menu_item(id).await?;
    state.promotions.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}
