//! PostgreSQL implementation of AnnouncementRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use warden_core::{
    Announcement, AnnouncementRepository, AnnouncementStatus, NewAnnouncement, RepoResult,
};

use crate::models::AnnouncementModel;

use super::error::{announcement_not_found, map_db_error};

/// PostgreSQL implementation of AnnouncementRepository
#[derive(Clone)]
pub struct PgAnnouncementRepository {
    pool: PgPool,
}

impl PgAnnouncementRepository {
    /// Create a new PgAnnouncementRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementRepository for PgAnnouncementRepository {
    #[instrument(skip(self, announcement), fields(run_at = %announcement.run_at))]
    async fn create(&self, announcement: &NewAnnouncement) -> RepoResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO announcements (content, run_at)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(&announcement.content)
        .bind(announcement.run_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_due(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<Announcement>> {
        let models = sqlx::query_as::<_, AnnouncementModel>(
            r"
            SELECT id, content, run_at, status, created_at
            FROM announcements
            WHERE status = 'pending' AND run_at <= $1
            ORDER BY run_at ASC
            LIMIT $2
            ",
        )
        .bind(now)
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(Announcement::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn mark_status(&self, id: i64, status: AnnouncementStatus) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE announcements SET status = $2 WHERE id = $1
            ",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(announcement_not_found(id));
        }

        Ok(())
    }
}
