//! Ports - traits implemented by the infrastructure layers

mod platform;
mod repositories;

pub use platform::{GuildDirectory, PlatformClient, PlatformError, PlatformResult};
pub use repositories::{
    AnnouncementRepository, RecordRepository, RepoResult, RuleRepository, SettingsRepository,
};
