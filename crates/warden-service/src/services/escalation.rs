//! Escalation rule resolution and execution
//!
//! After a record lands in the ledger the caller recomputes the member's
//! standing, resolves the highest rule whose threshold the standing meets,
//! and applies the rule's action against the platform. Platform failures
//! become a `Failed` outcome, never an `Err`: escalation trouble must not
//! unwind a record that is already committed.

use tracing::{info, instrument, warn};

use warden_core::{EscalationAction, EscalationRule, RecordKind, Snowflake, Standing};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::{GuardedOperation, PermissionService};

/// Lifecycle of one escalation execution
///
/// Transitions are `Pending -> Applying -> Applied | Failed`. The states
/// exist for observability; only the terminal state reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExecutionState {
    Pending,
    Applying,
    Applied,
    Failed,
}

impl ExecutionState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Applying => "applying",
            Self::Applied => "applied",
            Self::Failed => "failed",
        }
    }
}

/// Terminal result of applying one escalation rule
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    Applied {
        rule: EscalationRule,
    },
    Failed {
        rule: EscalationRule,
        reason: String,
    },
}

impl ExecutionOutcome {
    pub fn rule(&self) -> &EscalationRule {
        match self {
            Self::Applied { rule } | Self::Failed { rule, .. } => rule,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// One-line summary suitable for the guild's log channel
    pub fn summary(&self, user_id: Snowflake) -> String {
        let rule = self.rule();
        let action = describe_action(rule);
        match self {
            Self::Applied { .. } => format!(
                "Escalation applied to <@{user_id}>: {action} (threshold {})",
                rule.threshold
            ),
            Self::Failed { reason, .. } => format!(
                "Escalation for <@{user_id}> could not be applied: {action} (threshold {}): {reason}",
                rule.threshold
            ),
        }
    }
}

fn describe_action(rule: &EscalationRule) -> String {
    match rule.action {
        EscalationAction::Timeout => {
            let minutes = rule.timeout_minutes.unwrap_or(0);
            format!("timeout for {minutes} minutes")
        }
        EscalationAction::Kick => "kick".to_string(),
        EscalationAction::Ban => "ban".to_string(),
        EscalationAction::GrantRole => match rule.role_id {
            Some(role_id) => format!("grant role {role_id}"),
            None => "grant role".to_string(),
        },
    }
}

/// Service resolving and executing escalation rules
pub struct EscalationService<'a> {
    context: &'a ServiceContext,
}

impl<'a> EscalationService<'a> {
    pub fn new(context: &'a ServiceContext) -> Self {
        Self { context }
    }

    /// Resolve the rule that fires for the given standing, if any
    ///
    /// Only rules of the just-recorded `kind` are considered, against the
    /// standing's effective count for that kind. Among the rules at or
    /// below the count, the largest threshold wins.
    #[instrument(skip(self, standing), fields(guild_id = %guild_id, kind = %kind))]
    pub async fn resolve(
        &self,
        guild_id: Snowflake,
        kind: RecordKind,
        standing: &Standing,
    ) -> ServiceResult<Option<EscalationRule>> {
        let rules = self
            .context
            .rule_repo()
            .find_by_guild_kind(guild_id, kind)
            .await?;
        let effective = standing.effective_for(kind);
        Ok(EscalationRule::select(&rules, kind, effective).cloned())
    }

    /// Apply one resolved rule to a member
    ///
    /// Infallible at the `Result` level: any platform error is folded into
    /// `ExecutionOutcome::Failed`.
    #[instrument(
        skip(self, rule),
        fields(
            guild_id = %guild_id,
            user_id = %user_id,
            action = rule.action.as_str(),
            threshold = rule.threshold,
        )
    )]
    pub async fn execute(
        &self,
        rule: EscalationRule,
        guild_id: Snowflake,
        user_id: Snowflake,
        reason: &str,
    ) -> ExecutionOutcome {
        let mut state = ExecutionState::Pending;
        info!(state = state.as_str(), "escalation resolved");

        state = ExecutionState::Applying;
        info!(state = state.as_str(), "applying escalation action");

        let platform = self.context.platform();
        let result = match rule.action {
            EscalationAction::Timeout => match rule.timeout_minutes {
                Some(minutes) => platform.timeout_member(guild_id, user_id, minutes, reason).await,
                None => {
                    // Rule validation requires a duration; a bare timeout rule
                    // can only come from a bypassed constructor.
                    state = ExecutionState::Failed;
                    warn!(state = state.as_str(), "timeout rule without a duration");
                    return ExecutionOutcome::Failed {
                        rule,
                        reason: "timeout rule has no duration".to_string(),
                    };
                }
            },
            EscalationAction::Kick => platform.kick_member(guild_id, user_id, reason).await,
            EscalationAction::Ban => platform.ban_member(guild_id, user_id, reason).await,
            EscalationAction::GrantRole => match rule.role_id {
                Some(role_id) => platform.grant_role(guild_id, user_id, role_id).await,
                None => {
                    state = ExecutionState::Failed;
                    warn!(state = state.as_str(), "grant_role rule without a role");
                    return ExecutionOutcome::Failed {
                        rule,
                        reason: "grant_role rule has no role".to_string(),
                    };
                }
            },
        };

        match result {
            Ok(()) => {
                state = ExecutionState::Applied;
                info!(state = state.as_str(), "escalation applied");
                ExecutionOutcome::Applied { rule }
            }
            Err(err) => {
                state = ExecutionState::Failed;
                warn!(state = state.as_str(), error = %err, "escalation failed");
                ExecutionOutcome::Failed {
                    rule,
                    reason: err.to_string(),
                }
            }
        }
    }

    /// All escalation rules configured for a guild, ordered by kind then
    /// ascending threshold
    pub async fn list_rules(&self, guild_id: Snowflake) -> ServiceResult<Vec<EscalationRule>> {
        Ok(self.context.rule_repo().find_by_guild(guild_id).await?)
    }

    /// Create or replace the rule at `(guild, kind, threshold)`
    ///
    /// Only the guild owner or the bot developer may change rules. An
    /// existing rule with the same key is replaced wholesale.
    #[instrument(skip(self, rule), fields(guild_id = %rule.guild_id, actor_id = %actor_id))]
    pub async fn upsert_rule(&self, actor_id: Snowflake, rule: EscalationRule) -> ServiceResult<()> {
        self.authorize_rule_change(rule.guild_id, actor_id).await?;
        self.context.rule_repo().upsert(&rule).await?;
        info!(kind = %rule.kind, threshold = rule.threshold, "escalation rule stored");
        Ok(())
    }

    /// Delete the rule at `(guild, kind, threshold)`
    #[instrument(skip(self), fields(guild_id = %guild_id, actor_id = %actor_id))]
    pub async fn delete_rule(
        &self,
        actor_id: Snowflake,
        guild_id: Snowflake,
        kind: RecordKind,
        threshold: i32,
    ) -> ServiceResult<()> {
        self.authorize_rule_change(guild_id, actor_id).await?;
        self.context
            .rule_repo()
            .delete(guild_id, kind, threshold)
            .await?;
        info!(kind = %kind, threshold, "escalation rule deleted");
        Ok(())
    }

    async fn authorize_rule_change(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<()> {
        let settings = self.context.settings_or_default(guild_id).await?;
        PermissionService::new(self.context)
            .authorize(
                guild_id,
                actor_id,
                None,
                GuardedOperation::ChangeSettings,
                &settings,
            )
            .await
    }

    /// Post an outcome summary to the guild's log channel, if configured
    ///
    /// Best effort: delivery failures are logged and swallowed.
    pub async fn notify(&self, guild_id: Snowflake, user_id: Snowflake, outcome: &ExecutionOutcome) {
        let settings = match self.context.settings_or_default(guild_id).await {
            Ok(settings) => settings,
            Err(err) => {
                warn!(guild_id = %guild_id, error = %err, "skipping log notification: settings unavailable");
                return;
            }
        };
        let Some(channel_id) = settings.log_channel_id else {
            return;
        };
        if let Err(err) = self
            .context
            .platform()
            .send_log_message(channel_id, &outcome.summary(user_id))
            .await
        {
            warn!(guild_id = %guild_id, channel_id = %channel_id, error = %err, "log notification failed");
        }
    }
}
