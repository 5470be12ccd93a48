//! PostgreSQL implementation of SettingsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use warden_core::{GuildSettings, RepoResult, SettingsRepository, Snowflake};

use crate::models::GuildSettingsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SettingsRepository
///
/// Write methods upsert the settings row so a guild touched for the first
/// time by any settings change starts from defaults.
#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    /// Create a new PgSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>> {
        let result = sqlx::query_as::<_, GuildSettingsModel>(
            r"
            SELECT guild_id, offset_enabled, admin_ids, log_channel_id
            FROM guild_settings
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(GuildSettings::from))
    }

    #[instrument(skip(self))]
    async fn set_offset_enabled(&self, guild_id: Snowflake, enabled: bool) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO guild_settings (guild_id, offset_enabled)
            VALUES ($1, $2)
            ON CONFLICT (guild_id) DO UPDATE SET offset_enabled = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(enabled)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_admin(&self, guild_id: Snowflake, admin_id: Snowflake) -> RepoResult<()> {
        // DISTINCT keeps the array duplicate-free when the same ID is
        // granted twice.
        sqlx::query(
            r"
            INSERT INTO guild_settings (guild_id, admin_ids)
            VALUES ($1, ARRAY[$2]::BIGINT[])
            ON CONFLICT (guild_id) DO UPDATE
            SET admin_ids = ARRAY(
                SELECT DISTINCT UNNEST(array_append(guild_settings.admin_ids, $2))
            )
            ",
        )
        .bind(guild_id.into_inner())
        .bind(admin_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_admin(&self, guild_id: Snowflake, admin_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r"
            UPDATE guild_settings
            SET admin_ids = array_remove(admin_ids, $2)
            WHERE guild_id = $1
            ",
        )
        .bind(guild_id.into_inner())
        .bind(admin_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_log_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO guild_settings (guild_id, log_channel_id)
            VALUES ($1, $2)
            ON CONFLICT (guild_id) DO UPDATE SET log_channel_id = $2
            ",
        )
        .bind(guild_id.into_inner())
        .bind(channel_id.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_with_log_channel(&self) -> RepoResult<Vec<GuildSettings>> {
        let models = sqlx::query_as::<_, GuildSettingsModel>(
            r"
            SELECT guild_id, offset_enabled, admin_ids, log_channel_id
            FROM guild_settings
            WHERE log_channel_id IS NOT NULL
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(models.into_iter().map(GuildSettings::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgSettingsRepository>();
    }
}
