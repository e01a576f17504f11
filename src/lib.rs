// Digital Menu API
// Restaurant menu with a promotion engine, served over HTTP with axum

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod promotions;
pub mod settings;
pub mod validation;

use axum::{
    extract::FromRef,
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{AuthService, TokenService, UserRepository};
use crate::catalog::CatalogRepository;
use crate::config::AppConfig;
use crate::engine::{EligibilityCache, RestaurantClock, DEFAULT_SNAPSHOT_TTL};
use crate::promotions::{PromotionRepository, PromotionService};
use crate::settings::SettingsRepository;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        auth::handlers::login_handler,
        auth::handlers::me_handler,
        auth::handlers::list_users_handler,
        auth::handlers::create_user_handler,
        auth::handlers::update_user_role_handler,
        catalog::handlers::public_menu_handler,
        catalog::handlers::list_categories_handler,
        catalog::handlers::create_category_handler,
        catalog::handlers::update_category_handler,
        catalog::handlers::delete_category_handler,
        catalog::handlers::list_menu_items_handler,
        catalog::handlers::get_menu_item_handler,
        catalog::handlers::create_menu_item_handler,
        catalog::handlers::update_menu_item_handler,
        catalog::handlers::delete_menu_item_handler,
        promotions::handlers::public_promotions_handler,
        promotions::handlers::banner_handler,
        promotions::handlers::record_view_handler,
        promotions::handlers::list_promotions_handler,
        promotions::handlers::create_promotion_handler,
        promotions::handlers::update_promotion_handler,
        promotions::handlers::delete_promotion_handler,
        promotions::handlers::list_linked_items_handler,
        promotions::handlers::link_item_handler,
        promotions::handlers::update_link_handler,
        promotions::handlers::unlink_item_handler,
        promotions::handlers::item_promotions_handler,
        promotions::handlers::view_report_handler,
        settings::handlers::public_settings_handler,
        settings::handlers::get_settings_handler,
        settings::handlers::update_settings_handler,
    ),
    components(
        schemas(
            models::Category,
            models::MenuItem,
            models::Promotion,
            models::PromotionItem,
            models::PromotionView,
            engine::DiscountType,
            engine::Offer,
            engine::LinkedItemPrice,
            engine::CountdownView,
            engine::TimeLeft,
            engine::ViewReport,
            engine::RankedPromotion,
            engine::WeeklySchedule,
            engine::DayHours,
            catalog::CreateCategory,
            catalog::UpdateCategory,
            catalog::CreateMenuItem,
            catalog::UpdateMenuItem,
            catalog::MenuItemCard,
            catalog::MenuSection,
            catalog::PublicMenu,
            promotions::CreatePromotion,
            promotions::UpdatePromotion,
            promotions::LinkItemRequest,
            promotions::UpdateLinkRequest,
            promotions::PromotionCard,
            promotions::BannerResponse,
            promotions::ItemPromotion,
            settings::RestaurantSettings,
            settings::UpdateSettings,
            settings::PublicSettings,
            auth::Role,
            auth::UserResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::models::CreateUserRequest,
            auth::models::UpdateRoleRequest,
            auth::models::UserEnvelope,
            auth::models::UserList,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "public", description = "Public menu, promotions and restaurant info"),
        (name = "auth", description = "Login and current user"),
        (name = "users", description = "Admin user management"),
        (name = "catalog", description = "Categories and menu items"),
        (name = "promotions", description = "Promotions and their linked items"),
        (name = "settings", description = "Restaurant settings"),
        (name = "reports", description = "Promotion view reports")
    ),
    info(
        title = "Digital Menu API",
        version = "1.0.0",
        description = "Restaurant menu with date-bounded promotions and per-item discounts"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clock: RestaurantClock,
    pub auth: AuthService,
    pub catalog: CatalogRepository,
    pub promotions: PromotionService,
    pub settings: SettingsRepository,
}

impl AppState {
    /// Wire repositories and services over one pool
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let clock = RestaurantClock::system(config.timezone);
        Self::with_clock(db, config, clock)
    }

    pub fn with_clock(db: PgPool, config: AppConfig, clock: RestaurantClock) -> Self {
        let tokens = TokenService::new(config.jwt_secret.clone(), config.jwt_ttl_secs);
        let auth = AuthService::new(UserRepository::new(db.clone()), tokens);

        let promotions = PromotionService::new(
            PromotionRepository::new(db.clone()),
            clock.clone(),
            Arc::new(EligibilityCache::new(DEFAULT_SNAPSHOT_TTL)),
            config.rotation_period,
        );

        Self {
            config: Arc::new(config),
            clock,
            auth,
            catalog: CatalogRepository::new(db.clone()),
            promotions,
            settings: SettingsRepository::new(db),
        }
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.tokens().clone()
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

/// Handler for GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up")),
    tag = "public"
)]
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS and tracing middleware
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/api/health", get(health))
        .route("/api/public/menu", get(catalog::public_menu_handler))
        .route("/api/public/settings", get(settings::public_settings_handler))
        .route("/api/public/promotions", get(promotions::public_promotions_handler))
        .route("/api/public/promotions/banner", get(promotions::banner_handler))
        .route("/api/public/promotions/:id/views", post(promotions::record_view_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/me", get(auth::me_handler));

    let admin = Router::new()
        .route(
            "/api/admin/categories",
            get(catalog::list_categories_handler).post(catalog::create_category_handler),
        )
        .route(
            "/api/admin/categories/:id",
            put(catalog::update_category_handler).delete(catalog::delete_category_handler),
        )
        .route(
            "/api/admin/menu-items",
            get(catalog::list_menu_items_handler).post(catalog::create_menu_item_handler),
        )
        .route(
            "/api/admin/menu-items/:id",
            get(catalog::get_menu_item_handler)
                .put(catalog::update_menu_item_handler)
                .delete(catalog::delete_menu_item_handler),
        )
        .route(
            "/api/admin/menu-items/:id/promotions",
            get(promotions::item_promotions_handler),
        )
        .route(
            "/api/admin/promotions",
            get(promotions::list_promotions_handler).post(promotions::create_promotion_handler),
        )
        .route(
            "/api/admin/promotions/:id",
            put(promotions::update_promotion_handler).delete(promotions::delete_promotion_handler),
        )
        .route(
            "/api/admin/promotions/:id/items",
            get(promotions::list_linked_items_handler).post(promotions::link_item_handler),
        )
        .route(
            "/api/admin/promotions/:id/items/:menu_item_id",
            put(promotions::update_link_handler).delete(promotions::unlink_item_handler),
        )
        .route(
            "/api/admin/settings",
            get(settings::get_settings_handler).put(settings::update_settings_handler),
        )
        .route(
            "/api/admin/reports/promotion-views",
            get(promotions::view_report_handler),
        )
        .route(
            "/api/admin/users",
            get(auth::list_users_handler).post(auth::create_user_handler),
        )
        .route("/api/admin/users/:id/role", put(auth::update_user_role_handler));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public)
        .merge(admin)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
