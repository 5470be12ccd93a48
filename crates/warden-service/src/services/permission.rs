//! Permission checks for moderation and settings operations
//!
//! The guild owner and the configured bot developer always pass. Other
//! callers need a delegated-admin grant (their user id, or one of their
//! role ids, listed in the guild's `admin_ids`).

use tracing::instrument;

use warden_core::{GuildSettings, Snowflake};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Operations that require an authorization decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedOperation {
    /// Append a warning or commendation to a member's ledger
    WriteRecord,
    /// Change guild settings (offset toggle, admins, log channel)
    ChangeSettings,
}

/// Service for authorization decisions
pub struct PermissionService<'a> {
    context: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    pub fn new(context: &'a ServiceContext) -> Self {
        Self { context }
    }

    /// Check that `actor_id` may perform `operation` in `guild_id`, targeting
    /// `target_id` where the operation has a target.
    ///
    /// # Errors
    /// Returns `ServiceError::PermissionDenied` when the actor is not
    /// authorized, and `ServiceError::Collaborator` when the platform
    /// directory lookup needed for the decision fails.
    #[instrument(skip(self, settings), fields(guild_id = %guild_id, actor_id = %actor_id))]
    pub async fn authorize(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        target_id: Option<Snowflake>,
        operation: GuardedOperation,
        settings: &GuildSettings,
    ) -> ServiceResult<()> {
        if actor_id == self.context.developer_id() {
            return Ok(());
        }

        let owner_id = self
            .context
            .directory()
            .owner_of(guild_id)
            .await
            .map_err(|e| ServiceError::collaborator(&e))?;

        if actor_id == owner_id {
            return Ok(());
        }

        match operation {
            GuardedOperation::ChangeSettings => Err(ServiceError::permission_denied(
                "only the guild owner or the bot developer may change settings",
            )),
            GuardedOperation::WriteRecord => {
                if !self.is_delegated(guild_id, actor_id, settings).await? {
                    return Err(ServiceError::permission_denied(
                        "delegated admin grant required to write records",
                    ));
                }
                // Delegated admins cannot act on the owner or on another admin.
                if let Some(target_id) = target_id {
                    if target_id == owner_id
                        || self.is_delegated(guild_id, target_id, settings).await?
                    {
                        return Err(ServiceError::permission_denied(
                            "cannot target the guild owner or another delegated admin",
                        ));
                    }
                }
                Ok(())
            }
        }
    }

    /// Whether a member holds a delegated-admin grant, directly or via a role
    async fn is_delegated(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        settings: &GuildSettings,
    ) -> ServiceResult<bool> {
        if settings.admin_ids.is_empty() {
            return Ok(false);
        }
        if settings.is_delegated(user_id) {
            return Ok(true);
        }
        let role_ids = self
            .context
            .directory()
            .role_ids_of(guild_id, user_id)
            .await
            .map_err(|e| ServiceError::collaborator(&e))?;
        Ok(settings.is_any_delegated(role_ids))
    }
}
