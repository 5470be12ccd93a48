//! Announcement entity - a durable scheduled broadcast

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Delivery state of a scheduled announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    Pending,
    Sent,
    Failed,
}

impl AnnouncementStatus {
    /// Storage identifier for this status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }

    /// Parse a storage identifier
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            other => Err(DomainError::UnknownAnnouncementStatus(other.to_string())),
        }
    }
}

impl fmt::Display for AnnouncementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled one-off broadcast to every guild's log channel
///
/// Stored durably so a pending announcement survives a process restart; a
/// poller task delivers due rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub id: i64,
    pub content: String,
    pub run_at: DateTime<Utc>,
    pub status: AnnouncementStatus,
    pub created_at: DateTime<Utc>,
}

/// A validated, not-yet-persisted announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnnouncement {
    pub content: String,
    pub run_at: DateTime<Utc>,
}

impl NewAnnouncement {
    /// Platform message length ceiling
    pub const MAX_CONTENT_LEN: usize = 2000;

    /// Build a validated announcement
    ///
    /// # Errors
    /// Returns a validation error for blank content or content longer than
    /// the platform message limit.
    pub fn new(content: impl Into<String>, run_at: DateTime<Utc>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "announcement content must not be blank".to_string(),
            ));
        }
        if content.chars().count() > Self::MAX_CONTENT_LEN {
            return Err(DomainError::ValidationError(format!(
                "announcement content exceeds {} characters",
                Self::MAX_CONTENT_LEN
            )));
        }
        Ok(Self { content, run_at })
    }
}
