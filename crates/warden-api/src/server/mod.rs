//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use warden_common::{AppConfig, AppError, JwtService};
use warden_db::{
    create_pool, run_migrations, PgAnnouncementRepository, PgRecordRepository, PgRuleRepository,
    PgSettingsRepository,
};
use warden_discord::DiscordClient;
use warden_service::{run_announcement_poller, ServiceContextBuilder};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(health_routes());
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = warden_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("Migrations applied");

    // Create Discord REST client
    let discord = Arc::new(
        DiscordClient::new(&config.discord.api_base, &config.discord.bot_token)
            .map_err(|e| AppError::Config(e.to_string()))?,
    );

    // Create JWT service
    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.session_token_expiry,
    ));

    // Create repositories
    let record_repo = Arc::new(PgRecordRepository::new(pool.clone()));
    let settings_repo = Arc::new(PgSettingsRepository::new(pool.clone()));
    let rule_repo = Arc::new(PgRuleRepository::new(pool.clone()));
    let announcement_repo = Arc::new(PgAnnouncementRepository::new(pool.clone()));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .record_repo(record_repo)
        .settings_repo(settings_repo)
        .rule_repo(rule_repo)
        .announcement_repo(announcement_repo)
        .platform(discord.clone())
        .directory(discord)
        .jwt_service(jwt_service)
        .developer_id(config.discord.developer_id)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    // Start the announcement delivery poller
    let poll_interval = Duration::from_secs(config.announcements.poll_interval_secs);
    tokio::spawn(run_announcement_poller(
        service_context.clone(),
        poll_interval,
    ));
    info!(
        interval_secs = config.announcements.poll_interval_secs,
        "Announcement poller started"
    );

    Ok(AppState::new(service_context, pool, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
