//! Member record entity - one entry in the append-only scoring ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Kind of scoring event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Warning,
    Commendation,
}

impl RecordKind {
    /// Storage identifier for this kind
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Commendation => "commendation",
        }
    }

    /// Parse a storage identifier
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "warning" => Ok(Self::Warning),
            "commendation" => Ok(Self::Commendation),
            other => Err(DomainError::UnknownRecordKind(other.to_string())),
        }
    }

    /// The kind that offsets this one when offsetting is enabled
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Warning => Self::Commendation,
            Self::Commendation => Self::Warning,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scoring event as stored in the ledger (immutable once created)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub id: i64,
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub user_display_name: String,
    pub kind: RecordKind,
    pub magnitude: i32,
    pub reason: String,
    pub operator_id: Snowflake,
    pub operator_display_name: String,
    pub created_at: DateTime<Utc>,
}

/// A validated, not-yet-persisted ledger entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMemberRecord {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub user_display_name: String,
    pub kind: RecordKind,
    pub magnitude: i32,
    pub reason: String,
    pub operator_id: Snowflake,
    pub operator_display_name: String,
}

impl NewMemberRecord {
    /// Largest magnitude a single event may carry (two-digit entry field)
    pub const MAX_MAGNITUDE: i32 = 99;

    /// Longest accepted reason text
    pub const MAX_REASON_LEN: usize = 200;

    /// Reason recorded when the operator leaves it blank
    pub const DEFAULT_REASON: &'static str = "No reason provided";

    /// Build a validated ledger entry
    ///
    /// # Errors
    /// Returns a validation error when the magnitude is outside `1..=99` or
    /// the reason exceeds 200 characters. A blank reason is replaced with
    /// [`Self::DEFAULT_REASON`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        guild_id: Snowflake,
        user_id: Snowflake,
        user_display_name: impl Into<String>,
        kind: RecordKind,
        magnitude: i32,
        reason: Option<String>,
        operator_id: Snowflake,
        operator_display_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if magnitude < 1 || magnitude > Self::MAX_MAGNITUDE {
            return Err(DomainError::MagnitudeOutOfRange {
                magnitude,
                max: Self::MAX_MAGNITUDE,
            });
        }

        let reason = match reason {
            Some(text) if !text.trim().is_empty() => {
                if text.chars().count() > Self::MAX_REASON_LEN {
                    return Err(DomainError::ReasonTooLong {
                        max: Self::MAX_REASON_LEN,
                    });
                }
                text
            }
            _ => Self::DEFAULT_REASON.to_string(),
        };

        Ok(Self {
            guild_id,
            user_id,
            user_display_name: user_display_name.into(),
            kind,
            magnitude,
            reason,
            operator_id,
            operator_display_name: operator_display_name.into(),
        })
    }
}

/// Ledger totals per kind for one member in one guild
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindTotals {
    pub warning: i64,
    pub commendation: i64,
}

impl KindTotals {
    /// Total magnitude for one kind
    #[must_use]
    pub const fn total_for(&self, kind: RecordKind) -> i64 {
        match kind {
            RecordKind::Warning => self.warning,
            RecordKind::Commendation => self.commendation,
        }
    }

    /// Add a magnitude to one kind's total
    pub fn add(&mut self, kind: RecordKind, magnitude: i64) {
        match kind {
            RecordKind::Warning => self.warning += magnitude,
            RecordKind::Commendation => self.commendation += magnitude,
        }
    }
}
