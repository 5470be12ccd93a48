//! Escalation rule handlers
//!
//! Endpoints for managing a guild's escalation ladder.

use axum::{
    extract::{Path, State},
    Json,
};
use warden_core::EscalationRule;
use warden_service::{EscalationService, RuleResponse, UpsertRuleRequest};

use crate::extractors::{AuthUser, GuildIdPath, RulePath, ValidatedJson};
use crate::response::{ApiError, ApiResult, NoContent};
use crate::state::AppState;

/// List a guild's escalation rules
///
/// GET /guilds/{guild_id}/rules
pub async fn list_rules(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<Vec<RuleResponse>>> {
    let guild_id = path.guild_id()?;

    let service = EscalationService::new(state.service_context());
    let rules = service.list_rules(guild_id).await?;
    Ok(Json(rules.iter().map(RuleResponse::from).collect()))
}

/// Create or replace one escalation rule
///
/// PUT /guilds/{guild_id}/rules
pub async fn upsert_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<UpsertRuleRequest>,
) -> ApiResult<Json<RuleResponse>> {
    let guild_id = path.guild_id()?;
    let role_id = request
        .role_id
        .map(|raw| {
            raw.parse()
                .map_err(|_| ApiError::invalid_body("Invalid role_id format"))
        })
        .transpose()?;

    let rule = EscalationRule::new(
        guild_id,
        request.kind,
        request.threshold,
        request.action,
        request.timeout_minutes,
        role_id,
    )?;
    let response = RuleResponse::from(&rule);

    let service = EscalationService::new(state.service_context());
    service.upsert_rule(auth.user_id, rule).await?;
    Ok(Json(response))
}

/// Delete one escalation rule
///
/// DELETE /guilds/{guild_id}/rules/{kind}/{threshold}
pub async fn delete_rule(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<RulePath>,
) -> ApiResult<NoContent> {
    let guild_id = path.guild_id()?;
    let kind = path.kind()?;

    let service = EscalationService::new(state.service_context());
    service
        .delete_rule(auth.user_id, guild_id, kind, path.threshold)
        .await?;
    Ok(NoContent)
}
