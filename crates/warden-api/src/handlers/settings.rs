//! Settings handlers
//!
//! Endpoints for reading and changing per-guild settings.

use axum::{
    extract::{Path, State},
    Json,
};
use warden_service::{SetLogChannelRequest, SetOffsetRequest, SettingsResponse, SettingsService};

use crate::extractors::{AuthUser, GuildAdminPath, GuildIdPath};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Get guild settings
///
/// GET /guilds/{guild_id}/settings
pub async fn get_settings(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<SettingsResponse>> {
    let guild_id = path.guild_id()?;

    let service = SettingsService::new(state.service_context());
    let settings = service.guild_settings(guild_id).await?;
    Ok(Json(SettingsResponse::from(&settings)))
}

/// Toggle warning/commendation offsetting
///
/// PUT /guilds/{guild_id}/settings/offset
pub async fn set_offset(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
    Json(request): Json<SetOffsetRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    let guild_id = path.guild_id()?;

    let service = SettingsService::new(state.service_context());
    let settings = service
        .set_offset_enabled(auth.user_id, guild_id, request.enabled)
        .await?;
    Ok(Json(SettingsResponse::from(&settings)))
}

/// Set or clear the escalation log channel
///
/// PUT /guilds/{guild_id}/settings/log-channel
pub async fn set_log_channel(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
    Json(request): Json<SetLogChannelRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    let guild_id = path.guild_id()?;
    let channel_id = request
        .channel_id
        .map(|raw| {
            raw.parse()
                .map_err(|_| ApiError::invalid_body("Invalid channel_id format"))
        })
        .transpose()?;

    let service = SettingsService::new(state.service_context());
    let settings = service
        .set_log_channel(auth.user_id, guild_id, channel_id)
        .await?;
    Ok(Json(SettingsResponse::from(&settings)))
}

/// Grant a delegated-admin slot to a user or role
///
/// PUT /guilds/{guild_id}/admins/{admin_id}
pub async fn add_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildAdminPath>,
) -> ApiResult<Json<SettingsResponse>> {
    let guild_id = path.guild_id()?;
    let admin_id = path.admin_id()?;

    let service = SettingsService::new(state.service_context());
    let settings = service.add_admin(auth.user_id, guild_id, admin_id).await?;
    Ok(Json(SettingsResponse::from(&settings)))
}

/// Revoke a delegated-admin slot
///
/// DELETE /guilds/{guild_id}/admins/{admin_id}
pub async fn remove_admin(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildAdminPath>,
) -> ApiResult<Json<SettingsResponse>> {
    let guild_id = path.guild_id()?;
    let admin_id = path.admin_id()?;

    let service = SettingsService::new(state.service_context());
    let settings = service
        .remove_admin(auth.user_id, guild_id, admin_id)
        .await?;
    Ok(Json(SettingsResponse::from(&settings)))
}
