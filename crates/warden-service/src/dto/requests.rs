//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; those carrying free-form input
//! also implement `Validate`. Snowflake IDs arrive as strings for
//! JavaScript compatibility and are parsed at the handler boundary.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use warden_core::{EscalationAction, RecordKind};

// ============================================================================
// Record Requests
// ============================================================================

/// Submit a warning or commendation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRecordRequest {
    /// Target member ID
    pub user_id: String,

    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub user_display_name: String,

    pub kind: RecordKind,

    #[validate(range(min = 1, max = 99, message = "Magnitude must be 1-99"))]
    pub magnitude: i32,

    #[validate(length(max = 200, message = "Reason must be at most 200 characters"))]
    pub reason: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub operator_display_name: String,
}

// ============================================================================
// Settings Requests
// ============================================================================

/// Toggle warning/commendation offsetting
#[derive(Debug, Clone, Deserialize)]
pub struct SetOffsetRequest {
    pub enabled: bool,
}

/// Set or clear the escalation log channel
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SetLogChannelRequest {
    /// Channel ID, or null to clear
    pub channel_id: Option<String>,
}

// ============================================================================
// Rule Requests
// ============================================================================

/// Create or replace one escalation rule
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertRuleRequest {
    pub kind: RecordKind,

    #[validate(range(min = 1, message = "Threshold must be at least 1"))]
    pub threshold: i32,

    pub action: EscalationAction,

    #[validate(range(min = 1, message = "Timeout duration must be at least 1 minute"))]
    pub timeout_minutes: Option<i32>,

    pub role_id: Option<String>,
}

// ============================================================================
// Announcement Requests
// ============================================================================

/// Schedule a global announcement
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleAnnouncementRequest {
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,

    pub run_at: DateTime<Utc>,
}
