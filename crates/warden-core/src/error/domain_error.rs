//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Guild not found: {0}")]
    GuildNotFound(Snowflake),

    #[error("Member not found in guild")]
    MemberNotFound,

    #[error("Escalation rule not found")]
    RuleNotFound,

    #[error("Announcement not found: {0}")]
    AnnouncementNotFound(i64),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Magnitude out of range: {magnitude} (expected 1..={max})")]
    MagnitudeOutOfRange { magnitude: i32, max: i32 },

    #[error("Reason too long: max {max} characters")]
    ReasonTooLong { max: usize },

    #[error("Threshold must be positive: {0}")]
    InvalidThreshold(i32),

    #[error("Timeout action requires a duration in minutes")]
    MissingTimeoutDuration,

    #[error("Role-grant action requires a role ID")]
    MissingRoleId,

    #[error("Unknown record kind: {0}")]
    UnknownRecordKind(String),

    #[error("Unknown escalation action: {0}")]
    UnknownEscalationAction(String),

    #[error("Unknown announcement status: {0}")]
    UnknownAnnouncementStatus(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Actor is not a delegated admin in this guild")]
    NotDelegatedAdmin,

    #[error("Only the guild owner may record events against admins")]
    CannotTargetAdmin,

    #[error("Restricted to the guild owner")]
    OwnerOnly,

    #[error("Restricted to the bot developer")]
    DeveloperOnly,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Check if this is a "not found" error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GuildNotFound(_)
                | Self::MemberNotFound
                | Self::RuleNotFound
                | Self::AnnouncementNotFound(_)
        )
    }

    /// Check if this is a validation error
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::MagnitudeOutOfRange { .. }
                | Self::ReasonTooLong { .. }
                | Self::InvalidThreshold(_)
                | Self::MissingTimeoutDuration
                | Self::MissingRoleId
                | Self::UnknownRecordKind(_)
                | Self::UnknownEscalationAction(_)
                | Self::UnknownAnnouncementStatus(_)
        )
    }

    /// Check if this is an authorization error
    #[must_use]
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotDelegatedAdmin | Self::CannotTargetAdmin | Self::OwnerOnly | Self::DeveloperOnly
        )
    }

    /// Check if this is a storage-layer error
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }

    /// Get the error code for API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::GuildNotFound(_) => "GUILD_NOT_FOUND",
            Self::MemberNotFound => "MEMBER_NOT_FOUND",
            Self::RuleNotFound => "RULE_NOT_FOUND",
            Self::AnnouncementNotFound(_) => "ANNOUNCEMENT_NOT_FOUND",
            Self::ValidationError(_)
            | Self::MagnitudeOutOfRange { .. }
            | Self::ReasonTooLong { .. }
            | Self::InvalidThreshold(_)
            | Self::MissingTimeoutDuration
            | Self::MissingRoleId
            | Self::UnknownRecordKind(_)
            | Self::UnknownEscalationAction(_)
            | Self::UnknownAnnouncementStatus(_) => "VALIDATION_ERROR",
            Self::NotDelegatedAdmin | Self::CannotTargetAdmin | Self::OwnerOnly | Self::DeveloperOnly => {
                "PERMISSION_DENIED"
            }
            Self::DatabaseError(_) => "STORAGE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(DomainError::GuildNotFound(Snowflake::new(1)).is_not_found());
        assert!(DomainError::MagnitudeOutOfRange { magnitude: 0, max: 99 }.is_validation());
        assert!(DomainError::CannotTargetAdmin.is_authorization());
        assert!(DomainError::DatabaseError("down".into()).is_storage());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DomainError::NotDelegatedAdmin.code(), "PERMISSION_DENIED");
        assert_eq!(DomainError::RuleNotFound.code(), "RULE_NOT_FOUND");
        assert_eq!(
            DomainError::MissingTimeoutDuration.code(),
            "VALIDATION_ERROR"
        );
    }
}
