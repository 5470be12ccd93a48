//! Moderation pipeline
//!
//! `submit_record` is the single write path for the ledger: authorize,
//! validate, append, then recompute standing and run escalation under the
//! member's escalation lock. The record is committed before escalation
//! starts, so an escalation failure is reported but never rolls it back.

use tracing::{info, instrument};

use warden_core::{MemberRecord, NewMemberRecord, RecordKind, Snowflake, Standing};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::escalation::{EscalationService, ExecutionOutcome};
use super::permission::{GuardedOperation, PermissionService};

/// A warning or commendation to append to a member's ledger
#[derive(Debug, Clone)]
pub struct SubmitRecord {
    pub guild_id: Snowflake,
    pub user_id: Snowflake,
    pub user_display_name: String,
    pub kind: RecordKind,
    pub magnitude: i32,
    pub reason: Option<String>,
    pub operator_id: Snowflake,
    pub operator_display_name: String,
}

/// Result of a submitted record: the ledger entry id, the standing it
/// produced, and the escalation outcome when a rule fired
#[derive(Debug, Clone)]
pub struct RecordSubmission {
    pub record_id: i64,
    pub standing: Standing,
    pub escalation: Option<ExecutionOutcome>,
}

/// Service for the moderation write and read paths
pub struct ModerationService<'a> {
    context: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    pub fn new(context: &'a ServiceContext) -> Self {
        Self { context }
    }

    /// Append a record and run escalation for the member it targets
    #[instrument(
        skip(self, command),
        fields(
            guild_id = %command.guild_id,
            user_id = %command.user_id,
            kind = %command.kind,
            operator_id = %command.operator_id,
        )
    )]
    pub async fn submit_record(&self, command: SubmitRecord) -> ServiceResult<RecordSubmission> {
        let settings = self.context.settings_or_default(command.guild_id).await?;

        PermissionService::new(self.context)
            .authorize(
                command.guild_id,
                command.operator_id,
                Some(command.user_id),
                GuardedOperation::WriteRecord,
                &settings,
            )
            .await?;

        let record = NewMemberRecord::new(
            command.guild_id,
            command.user_id,
            command.user_display_name.clone(),
            command.kind,
            command.magnitude,
            command.reason.clone(),
            command.operator_id,
            command.operator_display_name.clone(),
        )?;

        let record_id = self.context.record_repo().append(&record).await?;
        info!(record_id, "record appended");

        // The lock serializes standing recomputation and rule execution for
        // this member, so two near-simultaneous submits cannot both resolve
        // and apply the same rule from the same standing.
        let lock = self
            .context
            .escalation_lock(command.guild_id, command.user_id);
        let escalated = {
            let _guard = lock.lock().await;
            self.recompute_and_escalate(&command, settings.offset_enabled, &record.reason)
                .await
        };
        drop(lock);
        self.context
            .release_escalation_lock(command.guild_id, command.user_id);
        let (standing, escalation) = escalated?;

        Ok(RecordSubmission {
            record_id,
            standing,
            escalation,
        })
    }

    /// Recompute standing and run escalation; callers hold the member's lock
    async fn recompute_and_escalate(
        &self,
        command: &SubmitRecord,
        offset_enabled: bool,
        reason: &str,
    ) -> ServiceResult<(Standing, Option<ExecutionOutcome>)> {
        let totals = self
            .context
            .record_repo()
            .sum_by_kind(command.guild_id, command.user_id)
            .await?;
        let standing = Standing::from_totals(totals, offset_enabled);

        let escalation_service = EscalationService::new(self.context);
        let escalation = match escalation_service
            .resolve(command.guild_id, command.kind, &standing)
            .await?
        {
            Some(rule) => {
                let outcome = escalation_service
                    .execute(rule, command.guild_id, command.user_id, reason)
                    .await;
                escalation_service
                    .notify(command.guild_id, command.user_id, &outcome)
                    .await;
                Some(outcome)
            }
            None => None,
        };

        Ok((standing, escalation))
    }

    /// Current standing of one member
    pub async fn member_standing(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Standing> {
        super::standing::StandingService::new(self.context)
            .member_standing(guild_id, user_id)
            .await
    }

    /// Most recent ledger entries for one member, newest first
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn member_records(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        limit: i64,
    ) -> ServiceResult<Vec<MemberRecord>> {
        Ok(self
            .context
            .record_repo()
            .find_recent(guild_id, user_id, limit)
            .await?)
    }
}
