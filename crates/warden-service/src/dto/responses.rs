//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ============================================================================
// Record Responses
// ============================================================================

/// One ledger entry
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: i64,
    pub guild_id: String,
    pub user_id: String,
    pub user_display_name: String,
    pub kind: String,
    pub magnitude: i32,
    pub reason: String,
    pub operator_id: String,
    pub operator_display_name: String,
    pub created_at: DateTime<Utc>,
}

/// A member's current standing
#[derive(Debug, Serialize)]
pub struct StandingResponse {
    pub warning_total: i64,
    pub commendation_total: i64,
    pub effective_warning: i64,
    pub effective_commendation: i64,
}

/// Escalation outcome attached to a submission
#[derive(Debug, Serialize)]
pub struct EscalationOutcomeResponse {
    pub kind: String,
    pub threshold: i32,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Result of submitting a record
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub record_id: i64,
    pub standing: StandingResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation: Option<EscalationOutcomeResponse>,
}

// ============================================================================
// Settings Responses
// ============================================================================

/// Per-guild settings
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub guild_id: String,
    pub offset_enabled: bool,
    pub admin_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_channel_id: Option<String>,
}

// ============================================================================
// Rule Responses
// ============================================================================

/// One escalation rule
#[derive(Debug, Serialize)]
pub struct RuleResponse {
    pub kind: String,
    pub threshold: i32,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}

// ============================================================================
// Announcement Responses
// ============================================================================

/// Acknowledgement of a scheduled announcement
#[derive(Debug, Serialize)]
pub struct AnnouncementScheduledResponse {
    pub id: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Liveness probe response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness probe response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: &'static str,
}
