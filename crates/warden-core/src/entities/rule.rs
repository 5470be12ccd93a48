//! Escalation rule entity and the threshold resolver

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

use super::record::RecordKind;

/// Automated consequence fired when a threshold is crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationAction {
    Timeout,
    Kick,
    Ban,
    GrantRole,
}

impl EscalationAction {
    /// Storage identifier for this action
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Kick => "kick",
            Self::Ban => "ban",
            Self::GrantRole => "grant_role",
        }
    }

    /// Parse a storage identifier
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "timeout" => Ok(Self::Timeout),
            "kick" => Ok(Self::Kick),
            "ban" => Ok(Self::Ban),
            "grant_role" => Ok(Self::GrantRole),
            other => Err(DomainError::UnknownEscalationAction(other.to_string())),
        }
    }
}

impl fmt::Display for EscalationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a guild's escalation ladder
///
/// At most one rule exists per `(guild_id, kind, threshold)`; a later write
/// with the same key replaces the action and parameters in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRule {
    pub guild_id: Snowflake,
    pub kind: RecordKind,
    pub threshold: i32,
    pub action: EscalationAction,
    /// Required iff `action == Timeout`
    pub timeout_minutes: Option<i32>,
    /// Required iff `action == GrantRole`
    pub role_id: Option<Snowflake>,
}

impl EscalationRule {
    /// Build a validated rule
    ///
    /// # Errors
    /// Returns a validation error when the threshold is not positive or the
    /// action-specific parameter is missing or invalid.
    pub fn new(
        guild_id: Snowflake,
        kind: RecordKind,
        threshold: i32,
        action: EscalationAction,
        timeout_minutes: Option<i32>,
        role_id: Option<Snowflake>,
    ) -> Result<Self, DomainError> {
        if threshold < 1 {
            return Err(DomainError::InvalidThreshold(threshold));
        }

        match action {
            EscalationAction::Timeout => {
                if !timeout_minutes.is_some_and(|minutes| minutes > 0) {
                    return Err(DomainError::MissingTimeoutDuration);
                }
            }
            EscalationAction::GrantRole => {
                if !role_id.is_some_and(|id| !id.is_zero()) {
                    return Err(DomainError::MissingRoleId);
                }
            }
            EscalationAction::Kick | EscalationAction::Ban => {}
        }

        Ok(Self {
            guild_id,
            kind,
            threshold,
            action,
            // Drop parameters that do not belong to the action
            timeout_minutes: (action == EscalationAction::Timeout)
                .then_some(timeout_minutes)
                .flatten(),
            role_id: (action == EscalationAction::GrantRole)
                .then_some(role_id)
                .flatten(),
        })
    }

    /// Pick the single rule to fire for an effective count
    ///
    /// Among rules for the given kind whose threshold is met, the one with
    /// the largest threshold wins: a single high-magnitude event may skip
    /// past several thresholds, and only the highest-reached consequence
    /// should apply. Returns `None` when no threshold is met.
    #[must_use]
    pub fn select(rules: &[EscalationRule], kind: RecordKind, effective_count: i64) -> Option<&EscalationRule> {
        rules
            .iter()
            .filter(|rule| rule.kind == kind && i64::from(rule.threshold) <= effective_count)
            .max_by_key(|rule| rule.threshold)
    }
}
