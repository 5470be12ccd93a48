//! Record handlers
//!
//! Endpoints for submitting ledger entries and reading a member's
//! standing and history.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use warden_service::{
    ModerationService, RecordResponse, SubmissionResponse, SubmitRecord, SubmitRecordRequest,
};

use crate::extractors::{AuthUser, GuildIdPath, GuildUserPath, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created};
use crate::state::AppState;

/// Default and maximum page sizes for record history
const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub limit: Option<i64>,
}

/// Submit a warning or commendation
///
/// POST /guilds/{guild_id}/records
pub async fn submit_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<SubmitRecordRequest>,
) -> ApiResult<Created<Json<SubmissionResponse>>> {
    let guild_id = path.guild_id()?;
    let user_id = request
        .user_id
        .parse()
        .map_err(|_| ApiError::invalid_body("Invalid user_id format"))?;

    let command = SubmitRecord {
        guild_id,
        user_id,
        user_display_name: request.user_display_name,
        kind: request.kind,
        magnitude: request.magnitude,
        reason: request.reason,
        operator_id: auth.user_id,
        operator_display_name: request.operator_display_name,
    };

    let service = ModerationService::new(state.service_context());
    let submission = service.submit_record(command).await?;
    Ok(Created(Json(SubmissionResponse::from(&submission))))
}

/// Get a member's current standing
///
/// GET /guilds/{guild_id}/members/{user_id}/standing
pub async fn get_standing(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<GuildUserPath>,
) -> ApiResult<Json<warden_service::StandingResponse>> {
    let guild_id = path.guild_id()?;
    let user_id = path.user_id()?;

    let service = ModerationService::new(state.service_context());
    let standing = service.member_standing(guild_id, user_id).await?;
    Ok(Json(standing.into()))
}

/// Get a member's recent ledger entries, newest first
///
/// GET /guilds/{guild_id}/members/{user_id}/records
pub async fn get_records(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<GuildUserPath>,
    Query(query): Query<RecordsQuery>,
) -> ApiResult<Json<Vec<RecordResponse>>> {
    let guild_id = path.guild_id()?;
    let user_id = path.user_id()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let service = ModerationService::new(state.service_context());
    let records = service.member_records(guild_id, user_id, limit).await?;
    Ok(Json(records.iter().map(RecordResponse::from).collect()))
}
