// HTTP handlers for promotion endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AdminUser;
use crate::engine::{LinkedItemPrice, ViewReport};
use crate::error::ApiError;
use crate::models::{Promotion, PromotionItem, PromotionView};
use crate::promotions::models::{
    BannerQuery, BannerResponse, CreatePromotion, ItemPromotion, LinkItemRequest, PromotionCard,
    PromotionQuery, UpdateLinkRequest, UpdatePromotion,
};
use crate::AppState;

/// Handler for GET /api/public/promotions
#[utoipa::path(
    get,
    path = "/api/public/promotions",
    responses(
        (status = 200, description = "Promotions live today, most recent first", body = Vec<PromotionCard>)
    ),
    tag = "public"
)]
pub async fn public_promotions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<PromotionCard>>, ApiError> {
    let cards = state.promotions.public_promotions().await?;
    Ok(Json(cards))
}

/// Handler for GET /api/public/promotions/banner
#[utoipa::path(
    get,
    path = "/api/public/promotions/banner",
    params(BannerQuery),
    responses(
        (status = 200, description = "Banner state at the requested position", body = BannerResponse)
    ),
    tag = "public"
)]
pub async fn banner_handler(
    State(state): State<AppState>,
    Query(query): Query<BannerQuery>,
) -> Result<Json<BannerResponse>, ApiError> {
    let banner = state.promotions.banner(query.position).await?;
    Ok(Json(banner))
}

/// Handler for POST /api/public/promotions/{id}/views
#[utoipa::path(
    post,
    path = "/api/public/promotions/{id}/views",
    params(("id" = Uuid, Path, description = "Promotion ID")),
    responses(
        (status = 201, description = "View recorded", body = PromotionView),
        (status = 404, description = "Unknown promotion")
    ),
    tag = "public"
)]
pub async fn record_view_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<PromotionView>), ApiError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());

    let view = state.promotions.record_view(id, user_agent).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Handler for GET /api/admin/promotions
#[utoipa::path(
    get,
    path = "/api/admin/promotions",
    params(PromotionQuery),
    responses(
        (status = 200, description = "Promotions, most recent first", body = Vec<Promotion>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn list_promotions_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<PromotionQuery>,
) -> Result<Json<Vec<Promotion>>, ApiError> {
    let promotions = state
        .promotions
        .list(query.active_only.unwrap_or(false))
        .await?;
    Ok(Json(promotions))
}

/// Handler for POST /api/admin/promotions
#[utoipa::path(
    post,
    path = "/api/admin/promotions",
    request_body = CreatePromotion,
    responses(
        (status = 201, description = "Promotion created", body = Promotion),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn create_promotion_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreatePromotion>,
) -> Result<(StatusCode, Json<Promotion>), ApiError> {
    payload.validate()?;
    let promotion = state.promotions.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(promotion)))
}

/// Handler for PUT /api/admin/promotions/{id}
#[utoipa::path(
    put,
    path = "/api/admin/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion ID")),
    request_body = UpdatePromotion,
    responses(
        (status = 200, description = "Promotion updated", body = Promotion),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Promotion not found")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn update_promotion_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePromotion>,
) -> Result<Json<Promotion>, ApiError> {
    payload.validate()?;
    let promotion = state.promotions.update(id, &payload).await?;
    Ok(Json(promotion))
}

/// Handler for DELETE /api/admin/promotions/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/promotions/{id}",
    params(("id" = Uuid, Path, description = "Promotion ID")),
    responses(
        (status = 204, description = "Promotion, its links and views deleted"),
        (status = 404, description = "Promotion not found")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn delete_promotion_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.promotions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/admin/promotions/{id}/items
#[utoipa::path(
    get,
    path = "/api/admin/promotions/{id}/items",
    params(("id" = Uuid, Path, description = "Promotion ID")),
    responses(
        (status = 200, description = "Linked items with discounted prices", body = Vec<LinkedItemPrice>),
        (status = 404, description = "Promotion not found")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn list_linked_items_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LinkedItemPrice>>, ApiError> {
    let rows = state.promotions.linked_items(id).await?;
    Ok(Json(rows))
}

/// Handler for POST /api/admin/promotions/{id}/items
#[utoipa::path(
    post,
    path = "/api/admin/promotions/{id}/items",
    params(("id" = Uuid, Path, description = "Promotion ID")),
    request_body = LinkItemRequest,
    responses(
        (status = 201, description = "Item linked", body = PromotionItem),
        (status = 400, description = "Invalid discount"),
        (status = 404, description = "Promotion or menu item not found"),
        (status = 409, description = "Item already linked")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn link_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LinkItemRequest>,
) -> Result<(StatusCode, Json<PromotionItem>), ApiError> {
    let link = state.promotions.link_item(id, &payload).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// Handler for PUT /api/admin/promotions/{id}/items/{menu_item_id}
#[utoipa::path(
    put,
    path = "/api/admin/promotions/{id}/items/{menu_item_id}",
    params(
        ("id" = Uuid, Path, description = "Promotion ID"),
        ("menu_item_id" = Uuid, Path, description = "Menu item ID")
    ),
    request_body = UpdateLinkRequest,
    responses(
        (status = 200, description = "Discount updated", body = PromotionItem),
        (status = 400, description = "Invalid discount"),
        (status = 404, description = "Link not found")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn update_link_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((id, menu_item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<PromotionItem>, ApiError> {
    let link = state
        .promotions
        .update_link(id, menu_item_id, &payload)
        .await?;
    Ok(Json(link))
}

/// Handler for DELETE /api/admin/promotions/{id}/items/{menu_item_id}
#[utoipa::path(
    delete,
    path = "/api/admin/promotions/{id}/items/{menu_item_id}",
    params(
        ("id" = Uuid, Path, description = "Promotion ID"),
        ("menu_item_id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 204, description = "Item unlinked"),
        (status = 404, description = "Link not found")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn unlink_item_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path((id, menu_item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.promotions.unlink(id, menu_item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/admin/menu-items/{id}/promotions
#[utoipa::path(
    get,
    path = "/api/admin/menu-items/{id}/promotions",
    params(("id" = Uuid, Path, description = "Menu item ID")),
    responses(
        (status = 200, description = "Promotions linked to the item", body = Vec<ItemPromotion>),
        (status = 404, description = "Menu item not found")
    ),
    security(("bearer" = [])),
    tag = "promotions"
)]
pub async fn item_promotions_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ItemPromotion>>, ApiError> {
    let rows = state.promotions.item_promotions(id).await?;
    Ok(Json(rows))
}

/// Handler for GET /api/admin/reports/promotion-views
#[utoipa::path(
    get,
    path = "/api/admin/reports/promotion-views",
    responses(
        (status = 200, description = "Views per promotion, ranked", body = ViewReport),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer" = [])),
    tag = "reports"
)]
pub async fn view_report_handler(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ViewReport>, ApiError> {
    let report = state.promotions.view_report().await?;
    tracing::debug!("Promotion view report: {} total views", report.total_views);
    Ok(Json(report))
}
