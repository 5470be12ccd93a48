//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Announcement, AnnouncementStatus, EscalationRule, GuildSettings, KindTotals, MemberRecord,
    NewAnnouncement, NewMemberRecord, RecordKind,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Record Repository (append-only ledger)
// ============================================================================

#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Append one scoring event; a single atomic insert
    ///
    /// The ledger offers no update or delete from this path; manual row
    /// removal is an administrative escape hatch outside this contract.
    async fn append(&self, record: &NewMemberRecord) -> RepoResult<i64>;

    /// Total magnitudes per kind for one member (absent kinds read as 0)
    async fn sum_by_kind(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<KindTotals>;

    /// Most recent events for one member, newest first
    async fn find_recent(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<MemberRecord>>;
}

// ============================================================================
// Settings Repository
// ============================================================================

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Find settings for a guild; `None` means the guild uses defaults
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>>;

    /// Toggle the warning/commendation offset policy
    async fn set_offset_enabled(&self, guild_id: Snowflake, enabled: bool) -> RepoResult<()>;

    /// Add a member or role ID to the delegated-admin set (idempotent)
    async fn add_admin(&self, guild_id: Snowflake, admin_id: Snowflake) -> RepoResult<()>;

    /// Remove a member or role ID from the delegated-admin set
    async fn remove_admin(&self, guild_id: Snowflake, admin_id: Snowflake) -> RepoResult<()>;

    /// Set or clear the audit log channel
    async fn set_log_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<()>;

    /// All guilds with a configured log channel (announcement fan-out)
    async fn find_with_log_channel(&self) -> RepoResult<Vec<GuildSettings>>;
}

// ============================================================================
// Rule Repository
// ============================================================================

#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// Insert or replace the rule at `(guild_id, kind, threshold)`
    async fn upsert(&self, rule: &EscalationRule) -> RepoResult<()>;

    /// All rules for a guild, ordered by kind then ascending threshold
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<EscalationRule>>;

    /// The rule ladder for one `(guild_id, kind)`, ascending threshold
    async fn find_by_guild_kind(
        &self,
        guild_id: Snowflake,
        kind: RecordKind,
    ) -> RepoResult<Vec<EscalationRule>>;

    /// Delete one rule; errors with `RuleNotFound` when absent
    async fn delete(
        &self,
        guild_id: Snowflake,
        kind: RecordKind,
        threshold: i32,
    ) -> RepoResult<()>;
}

// ============================================================================
// Announcement Repository
// ============================================================================

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// Persist a scheduled announcement, returning its ID
    async fn create(&self, announcement: &NewAnnouncement) -> RepoResult<i64>;

    /// Pending announcements whose `run_at` is at or before `now`
    async fn find_due(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<Announcement>>;

    /// Record the delivery outcome for one announcement
    async fn mark_status(&self, id: i64, status: AnnouncementStatus) -> RepoResult<()>;
}
