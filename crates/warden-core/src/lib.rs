//! # warden-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! platform collaborator traits. This crate has zero dependencies on
//! infrastructure (database, web framework, HTTP client, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Announcement, AnnouncementStatus, EscalationAction, EscalationRule, GuildSettings,
    KindTotals, MemberRecord, NewAnnouncement, NewMemberRecord, RecordKind, Standing,
};
pub use error::DomainError;
pub use traits::{
    AnnouncementRepository, GuildDirectory, PlatformClient, PlatformError, PlatformResult,
    RecordRepository, RepoResult, RuleRepository, SettingsRepository,
};
pub use value_objects::{Snowflake, SnowflakeParseError};
