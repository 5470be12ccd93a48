//! PostgreSQL implementation of RuleRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use warden_core::{EscalationRule, RecordKind, RepoResult, RuleRepository, Snowflake};

use crate::models::EscalationRuleModel;

use super::error::{map_db_error, rule_not_found};

/// PostgreSQL implementation of RuleRepository
#[derive(Clone)]
pub struct PgRuleRepository {
    pool: PgPool,
}

impl PgRuleRepository {
    /// Create a new PgRuleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleRepository for PgRuleRepository {
    #[instrument(skip(self, rule), fields(guild_id = %rule.guild_id, kind = %rule.kind, threshold = rule.threshold))]
    async fn upsert(&self, rule: &EscalationRule) -> RepoResult<()> {
        // A later write with the same (guild, kind, threshold) key replaces
        // the prior rule's action and parameters in place.
        sqlx::query(
            r"
            INSERT INTO escalation_rules
                (guild_id, kind, threshold, action, timeout_minutes, role_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (guild_id, kind, threshold)
            DO UPDATE SET action = $4, timeout_minutes = $5, role_id = $6
            ",
        )
        .bind(rule.guild_id.into_inner())
        .bind(rule.kind.as_str())
        .bind(rule.threshold)
        .bind(rule.action.as_str())
        .bind(rule.timeout_minutes)
        .bind(rule.role_id.map(Snowflake::into_inner))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<EscalationRule>> {
        let models = sqlx::query_as::<_, EscalationRuleModel>(
            r"
            SELECT guild_id, kind, threshold, action, timeout_minutes, role_id
            FROM escalation_rules
            WHERE guild_id = $1
            ORDER BY kind, threshold ASC
            ",
        )
        .bind(guild_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(EscalationRule::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_guild_kind(
        &self,
        guild_id: Snowflake,
        kind: RecordKind,
    ) -> RepoResult<Vec<EscalationRule>> {
        let models = sqlx::query_as::<_, EscalationRuleModel>(
            r"
            SELECT guild_id, kind, threshold, action, timeout_minutes, role_id
            FROM escalation_rules
            WHERE guild_id = $1 AND kind = $2
            ORDER BY threshold ASC
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        models.into_iter().map(EscalationRule::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn delete(
        &self,
        guild_id: Snowflake,
        kind: RecordKind,
        threshold: i32,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM escalation_rules
            WHERE guild_id = $1 AND kind = $2 AND threshold = $3
            ",
        )
        .bind(guild_id.into_inner())
        .bind(kind.as_str())
        .bind(threshold)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(rule_not_found());
        }

        Ok(())
    }
}
