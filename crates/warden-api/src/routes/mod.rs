//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{announcements, health, records, rules, settings};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (mounted outside the versioned prefix)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(record_routes())
        .merge(settings_routes())
        .merge(rule_routes())
        .merge(announcement_routes())
}

/// Ledger routes
fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/records", post(records::submit_record))
        .route(
            "/guilds/:guild_id/members/:user_id/standing",
            get(records::get_standing),
        )
        .route(
            "/guilds/:guild_id/members/:user_id/records",
            get(records::get_records),
        )
}

/// Guild settings routes
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/settings", get(settings::get_settings))
        .route("/guilds/:guild_id/settings/offset", put(settings::set_offset))
        .route(
            "/guilds/:guild_id/settings/log-channel",
            put(settings::set_log_channel),
        )
        .route("/guilds/:guild_id/admins/:admin_id", put(settings::add_admin))
        .route(
            "/guilds/:guild_id/admins/:admin_id",
            delete(settings::remove_admin),
        )
}

/// Escalation rule routes
fn rule_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/rules", get(rules::list_rules))
        .route("/guilds/:guild_id/rules", put(rules::upsert_rule))
        .route(
            "/guilds/:guild_id/rules/:kind/:threshold",
            delete(rules::delete_rule),
        )
}

/// Announcement routes
fn announcement_routes() -> Router<AppState> {
    Router::new().route("/announcements", post(announcements::schedule_announcement))
}
