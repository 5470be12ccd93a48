//! Platform collaborator traits
//!
//! The chat platform (gateway, REST API, caches) lives outside this core.
//! These traits describe the handful of calls the scoring pipeline makes
//! against it: the four escalation actions, audit messaging, and the
//! identity lookups the permission gate needs.

use async_trait::async_trait;
use thiserror::Error;

use crate::value_objects::Snowflake;

/// Failure modes of a platform call
///
/// Every variant is non-fatal to the triggering record insertion: the
/// executor maps all of them to a `Failed` outcome and no call is retried.
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("platform rejected the call: insufficient permission")]
    PermissionDenied,

    #[error("platform target not found")]
    NotFound,

    #[error("platform temporarily unavailable: {0}")]
    Unavailable(String),
}

/// Result type for platform calls
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Outbound platform actions
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Suspend a member's ability to send and interact for `minutes`
    async fn timeout_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        minutes: i32,
        reason: &str,
    ) -> PlatformResult<()>;

    /// Remove a member from the guild (rejoin remains possible)
    async fn kick_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        reason: &str,
    ) -> PlatformResult<()>;

    /// Remove a member and bar rejoin
    async fn ban_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        reason: &str,
    ) -> PlatformResult<()>;

    /// Attach a role to a member
    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()>;

    /// Post a message to a channel (audit notifications, announcements)
    async fn send_log_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()>;
}

/// Identity lookups consumed by the permission gate
#[async_trait]
pub trait GuildDirectory: Send + Sync {
    /// The guild's owner
    async fn owner_of(&self, guild_id: Snowflake) -> PlatformResult<Snowflake>;

    /// Role IDs held by a member in a guild
    async fn role_ids_of(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<Vec<Snowflake>>;
}
