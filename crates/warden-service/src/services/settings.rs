//! Guild settings management
//!
//! All mutations are restricted to the guild owner and the bot developer.
//! Reads require no authorization; settings contain nothing sensitive.

use tracing::{info, instrument};

use warden_core::{GuildSettings, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::permission::{GuardedOperation, PermissionService};

/// Service for reading and changing per-guild settings
pub struct SettingsService<'a> {
    context: &'a ServiceContext,
}

impl<'a> SettingsService<'a> {
    pub fn new(context: &'a ServiceContext) -> Self {
        Self { context }
    }

    /// Settings for a guild, defaults when the guild has never been configured
    pub async fn guild_settings(&self, guild_id: Snowflake) -> ServiceResult<GuildSettings> {
        self.context.settings_or_default(guild_id).await
    }

    /// Enable or disable warning/commendation offsetting
    #[instrument(skip(self), fields(guild_id = %guild_id, actor_id = %actor_id))]
    pub async fn set_offset_enabled(
        &self,
        actor_id: Snowflake,
        guild_id: Snowflake,
        enabled: bool,
    ) -> ServiceResult<GuildSettings> {
        self.authorize(guild_id, actor_id).await?;
        self.context
            .settings_repo()
            .set_offset_enabled(guild_id, enabled)
            .await?;
        info!(enabled, "offset mode changed");
        self.context.settings_or_default(guild_id).await
    }

    /// Grant a user or role a delegated-admin slot
    ///
    /// Adding an id that is already present leaves the grant list unchanged.
    #[instrument(skip(self), fields(guild_id = %guild_id, actor_id = %actor_id))]
    pub async fn add_admin(
        &self,
        actor_id: Snowflake,
        guild_id: Snowflake,
        admin_id: Snowflake,
    ) -> ServiceResult<GuildSettings> {
        self.authorize(guild_id, actor_id).await?;
        self.context
            .settings_repo()
            .add_admin(guild_id, admin_id)
            .await?;
        info!(admin_id = %admin_id, "delegated admin added");
        self.context.settings_or_default(guild_id).await
    }

    /// Revoke a delegated-admin slot
    ///
    /// Removing an id that was never granted is a no-op, not an error.
    #[instrument(skip(self), fields(guild_id = %guild_id, actor_id = %actor_id))]
    pub async fn remove_admin(
        &self,
        actor_id: Snowflake,
        guild_id: Snowflake,
        admin_id: Snowflake,
    ) -> ServiceResult<GuildSettings> {
        self.authorize(guild_id, actor_id).await?;
        self.context
            .settings_repo()
            .remove_admin(guild_id, admin_id)
            .await?;
        info!(admin_id = %admin_id, "delegated admin removed");
        self.context.settings_or_default(guild_id).await
    }

    /// Set or clear the channel that receives escalation summaries
    #[instrument(skip(self), fields(guild_id = %guild_id, actor_id = %actor_id))]
    pub async fn set_log_channel(
        &self,
        actor_id: Snowflake,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> ServiceResult<GuildSettings> {
        self.authorize(guild_id, actor_id).await?;
        self.context
            .settings_repo()
            .set_log_channel(guild_id, channel_id)
            .await?;
        match channel_id {
            Some(channel_id) => info!(channel_id = %channel_id, "log channel set"),
            None => info!("log channel cleared"),
        }
        self.context.settings_or_default(guild_id).await
    }

    async fn authorize(&self, guild_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
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
}
