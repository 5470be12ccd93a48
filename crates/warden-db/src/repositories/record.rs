//! PostgreSQL implementation of RecordRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use warden_core::{
    KindTotals, MemberRecord, NewMemberRecord, RecordKind, RecordRepository, RepoResult, Snowflake,
};

use crate::models::MemberRecordModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RecordRepository
#[derive(Clone)]
pub struct PgRecordRepository {
    pool: PgPool,
}

impl PgRecordRepository {
    /// Create a new PgRecordRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordRepository for PgRecordRepository {
    #[instrument(skip(self, record), fields(guild_id = %record.guild_id, user_id = %record.user_id, kind = %record.kind))]
    async fn append(&self, record: &NewMemberRecord) -> RepoResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r"
            INSERT INTO member_records
                (guild_id, user_id, user_name, kind, magnitude, reason, operator_id, operator_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            ",
        )
        .bind(record.guild_id.into_inner())
        .bind(record.user_id.into_inner())
        .bind(&record.user_display_name)
        .bind(record.kind.as_str())
        .bind(record.magnitude)
        .bind(&record.reason)
        .bind(record.operator_id.into_inner())
        .bind(&record.operator_display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn sum_by_kind(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<KindTotals> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r"
            SELECT kind, COALESCE(SUM(magnitude), 0)
            FROM member_records
            WHERE guild_id = $1 AND user_id = $2
            GROUP BY kind
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut totals = KindTotals::default();
        for (kind, total) in rows {
            totals.add(RecordKind::parse(&kind)?, total);
        }
        Ok(totals)
    }

    #[instrument(skip(self))]
    async fn find_recent(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<MemberRecord>> {
        let limit = limit.clamp(1, 100);

        let models = sqlx::query_as::<_, MemberRecordModel>(
            r"
            SELECT id, guild_id, user_id, user_name, kind, magnitude, reason,
                   operator_id, operator_name, created_at
            FROM member_records
            WHERE guild_id = $1 AND user_id = $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(MemberRecord::try_from).collect()
    }
}
