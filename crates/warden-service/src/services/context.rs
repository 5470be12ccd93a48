//! Service context - dependency container for services
//!
//! Holds the repositories, platform collaborators, and configuration every
//! service needs. Constructed once at process start and passed by reference
//! into the services; no component reaches into ambient global state.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use warden_common::JwtService;
use warden_core::{
    AnnouncementRepository, GuildDirectory, GuildSettings, PlatformClient, RecordRepository,
    RuleRepository, SettingsRepository, Snowflake,
};

use super::error::{ServiceError, ServiceResult};

/// Key for the per-member escalation lock registry
type LockKey = (Snowflake, Snowflake);

/// Service context containing all dependencies
///
/// Cloning is cheap: every field is behind an `Arc`, and clones share one
/// escalation-lock registry, so entry points racing on the same member
/// serialize on the same mutex.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    record_repo: Arc<dyn RecordRepository>,
    settings_repo: Arc<dyn SettingsRepository>,
    rule_repo: Arc<dyn RuleRepository>,
    announcement_repo: Arc<dyn AnnouncementRepository>,

    // Platform collaborators
    platform: Arc<dyn PlatformClient>,
    directory: Arc<dyn GuildDirectory>,

    // Services
    jwt_service: Arc<JwtService>,

    // Bot-wide developer identity (always authorized)
    developer_id: Snowflake,

    // Per-(guild, member) locks serializing resolve + execute
    escalation_locks: Arc<DashMap<LockKey, Arc<Mutex<()>>>>,
}

impl ServiceContext {
    /// Get the record repository
    pub fn record_repo(&self) -> &dyn RecordRepository {
        self.record_repo.as_ref()
    }

    /// Get the settings repository
    pub fn settings_repo(&self) -> &dyn SettingsRepository {
        self.settings_repo.as_ref()
    }

    /// Get the rule repository
    pub fn rule_repo(&self) -> &dyn RuleRepository {
        self.rule_repo.as_ref()
    }

    /// Get the announcement repository
    pub fn announcement_repo(&self) -> &dyn AnnouncementRepository {
        self.announcement_repo.as_ref()
    }

    /// Get the platform action client
    pub fn platform(&self) -> &dyn PlatformClient {
        self.platform.as_ref()
    }

    /// Get the guild directory
    pub fn directory(&self) -> &dyn GuildDirectory {
        self.directory.as_ref()
    }

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// The configured developer identity
    pub fn developer_id(&self) -> Snowflake {
        self.developer_id
    }

    /// Settings for a guild, falling back to defaults when no row exists
    pub async fn settings_or_default(&self, guild_id: Snowflake) -> ServiceResult<GuildSettings> {
        Ok(self
            .settings_repo()
            .find(guild_id)
            .await?
            .unwrap_or_else(|| GuildSettings::defaults(guild_id)))
    }

    /// The escalation lock for one member in one guild
    pub fn escalation_lock(&self, guild_id: Snowflake, user_id: Snowflake) -> Arc<Mutex<()>> {
        self.escalation_locks
            .entry((guild_id, user_id))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop a member's lock entry once no submission holds it
    ///
    /// Entries are re-created on demand, so the registry stays bounded by
    /// in-flight submissions rather than by every member ever moderated.
    /// `remove_if` holds the shard lock while checking the count, so a clone
    /// cannot be handed out between the check and the removal.
    pub fn release_escalation_lock(&self, guild_id: Snowflake, user_id: Snowflake) {
        self.escalation_locks
            .remove_if(&(guild_id, user_id), |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of member lock entries currently retained
    pub fn escalation_lock_count(&self) -> usize {
        self.escalation_locks.len()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("developer_id", &self.developer_id)
            .field("repositories", &"...")
            .field("platform", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    record_repo: Option<Arc<dyn RecordRepository>>,
    settings_repo: Option<Arc<dyn SettingsRepository>>,
    rule_repo: Option<Arc<dyn RuleRepository>>,
    announcement_repo: Option<Arc<dyn AnnouncementRepository>>,
    platform: Option<Arc<dyn PlatformClient>>,
    directory: Option<Arc<dyn GuildDirectory>>,
    jwt_service: Option<Arc<JwtService>>,
    developer_id: Option<Snowflake>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            record_repo: None,
            settings_repo: None,
            rule_repo: None,
            announcement_repo: None,
            platform: None,
            directory: None,
            jwt_service: None,
            developer_id: None,
        }
    }

    pub fn record_repo(mut self, repo: Arc<dyn RecordRepository>) -> Self {
        self.record_repo = Some(repo);
        self
    }

    pub fn settings_repo(mut self, repo: Arc<dyn SettingsRepository>) -> Self {
        self.settings_repo = Some(repo);
        self
    }

    pub fn rule_repo(mut self, repo: Arc<dyn RuleRepository>) -> Self {
        self.rule_repo = Some(repo);
        self
    }

    pub fn announcement_repo(mut self, repo: Arc<dyn AnnouncementRepository>) -> Self {
        self.announcement_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn PlatformClient>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn directory(mut self, directory: Arc<dyn GuildDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn developer_id(mut self, id: Snowflake) -> Self {
        self.developer_id = Some(id);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            record_repo: self
                .record_repo
                .ok_or_else(|| ServiceError::validation("record_repo is required"))?,
            settings_repo: self
                .settings_repo
                .ok_or_else(|| ServiceError::validation("settings_repo is required"))?,
            rule_repo: self
                .rule_repo
                .ok_or_else(|| ServiceError::validation("rule_repo is required"))?,
            announcement_repo: self
                .announcement_repo
                .ok_or_else(|| ServiceError::validation("announcement_repo is required"))?,
            platform: self
                .platform
                .ok_or_else(|| ServiceError::validation("platform is required"))?,
            directory: self
                .directory
                .ok_or_else(|| ServiceError::validation("directory is required"))?,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            developer_id: self
                .developer_id
                .ok_or_else(|| ServiceError::validation("developer_id is required"))?,
            escalation_locks: Arc::new(DashMap::new()),
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
