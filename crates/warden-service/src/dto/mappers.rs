//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use warden_core::{EscalationRule, GuildSettings, MemberRecord, Standing};

use crate::services::{ExecutionOutcome, RecordSubmission};

use super::responses::{
    EscalationOutcomeResponse, RecordResponse, RuleResponse, SettingsResponse, StandingResponse,
    SubmissionResponse,
};

impl From<&MemberRecord> for RecordResponse {
    fn from(record: &MemberRecord) -> Self {
        Self {
            id: record.id,
            guild_id: record.guild_id.to_string(),
            user_id: record.user_id.to_string(),
            user_display_name: record.user_display_name.clone(),
            kind: record.kind.as_str().to_string(),
            magnitude: record.magnitude,
            reason: record.reason.clone(),
            operator_id: record.operator_id.to_string(),
            operator_display_name: record.operator_display_name.clone(),
            created_at: record.created_at,
        }
    }
}

impl From<MemberRecord> for RecordResponse {
    fn from(record: MemberRecord) -> Self {
        Self::from(&record)
    }
}

impl From<&Standing> for StandingResponse {
    fn from(standing: &Standing) -> Self {
        Self {
            warning_total: standing.warning_total,
            commendation_total: standing.commendation_total,
            effective_warning: standing.effective_warning,
            effective_commendation: standing.effective_commendation,
        }
    }
}

impl From<Standing> for StandingResponse {
    fn from(standing: Standing) -> Self {
        Self::from(&standing)
    }
}

impl From<&GuildSettings> for SettingsResponse {
    fn from(settings: &GuildSettings) -> Self {
        Self {
            guild_id: settings.guild_id.to_string(),
            offset_enabled: settings.offset_enabled,
            admin_ids: settings
                .admin_ids
                .iter()
                .map(ToString::to_string)
                .collect(),
            log_channel_id: settings.log_channel_id.map(|id| id.to_string()),
        }
    }
}

impl From<GuildSettings> for SettingsResponse {
    fn from(settings: GuildSettings) -> Self {
        Self::from(&settings)
    }
}

impl From<&EscalationRule> for RuleResponse {
    fn from(rule: &EscalationRule) -> Self {
        Self {
            kind: rule.kind.as_str().to_string(),
            threshold: rule.threshold,
            action: rule.action.as_str().to_string(),
            timeout_minutes: rule.timeout_minutes,
            role_id: rule.role_id.map(|id| id.to_string()),
        }
    }
}

impl From<&ExecutionOutcome> for EscalationOutcomeResponse {
    fn from(outcome: &ExecutionOutcome) -> Self {
        let rule = outcome.rule();
        let failure = match outcome {
            ExecutionOutcome::Applied { .. } => None,
            ExecutionOutcome::Failed { reason, .. } => Some(reason.clone()),
        };
        Self {
            kind: rule.kind.as_str().to_string(),
            threshold: rule.threshold,
            action: rule.action.as_str().to_string(),
            timeout_minutes: rule.timeout_minutes,
            role_id: rule.role_id.map(|id| id.to_string()),
            applied: outcome.is_applied(),
            failure,
        }
    }
}

impl From<&RecordSubmission> for SubmissionResponse {
    fn from(submission: &RecordSubmission) -> Self {
        Self {
            record_id: submission.record_id,
            standing: StandingResponse::from(&submission.standing),
            escalation: submission
                .escalation
                .as_ref()
                .map(EscalationOutcomeResponse::from),
        }
    }
}
