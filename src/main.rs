use menu_api::{config::AppConfig, create_router, db, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("menu_api=info,tower_http=info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Digital Menu API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    let addr = config.bind_address();
    let refresh_period = config.eligibility_refresh;
    let bootstrap = config.admin_email.clone().zip(config.admin_password.clone());
    tracing::info!("Restaurant timezone: {}", config.timezone);

    let state = AppState::new(db_pool, config);

    if let Some((email, password)) = bootstrap {
        state
            .auth
            .ensure_admin(&email, &password)
            .await
            .expect("Failed to bootstrap admin user");
    }

    // Rebuilds the eligibility snapshot in the background while the server runs
    let refresher = state.promotions.spawn_refresher(refresh_period);

    let app = create_router(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Digital Menu API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");

    refresher.abort();
}
