//! Announcement database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use warden_core::{Announcement, AnnouncementStatus, DomainError};

/// Database model for the announcements table
#[derive(Debug, Clone, FromRow)]
pub struct AnnouncementModel {
    pub id: i64,
    pub content: String,
    pub run_at: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AnnouncementModel> for Announcement {
    type Error = DomainError;

    fn try_from(model: AnnouncementModel) -> Result<Self, Self::Error> {
        Ok(Announcement {
            id: model.id,
            content: model.content,
            run_at: model.run_at,
            status: AnnouncementStatus::parse(&model.status)?,
            created_at: model.created_at,
        })
    }
}
