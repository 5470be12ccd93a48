//! In-memory doubles for the repository and platform traits
//!
//! Every double keeps its state behind a `std::sync::Mutex`; nothing awaits
//! while a lock is held, so the doubles stay deadlock-free under the
//! pipeline's concurrency.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use warden_common::JwtService;
use warden_core::{
    Announcement, AnnouncementRepository, AnnouncementStatus, DomainError, EscalationRule,
    GuildDirectory, GuildSettings, KindTotals, MemberRecord, NewAnnouncement, NewMemberRecord,
    PlatformClient, PlatformError, PlatformResult, RecordKind, RecordRepository, RepoResult,
    RuleRepository, SettingsRepository, Snowflake,
};
use warden_service::{ServiceContext, ServiceContextBuilder};

static ID_COUNTER: AtomicI64 = AtomicI64::new(1);

/// A unique snowflake per call, for test isolation
pub fn unique_id() -> Snowflake {
    Snowflake::new(ID_COUNTER.fetch_add(1, Ordering::SeqCst))
}

// ============================================================================
// Record repository
// ============================================================================

#[derive(Default)]
pub struct MemoryRecordRepository {
    rows: Mutex<Vec<MemberRecord>>,
    next_id: AtomicI64,
}

impl MemoryRecordRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored rows for one member
    pub fn count_for(&self, guild_id: Snowflake, user_id: Snowflake) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.guild_id == guild_id && r.user_id == user_id)
            .count()
    }
}

#[async_trait]
impl RecordRepository for MemoryRecordRepository {
    async fn append(&self, record: &NewMemberRecord) -> RepoResult<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(MemberRecord {
            id,
            guild_id: record.guild_id,
            user_id: record.user_id,
            user_display_name: record.user_display_name.clone(),
            kind: record.kind,
            magnitude: record.magnitude,
            reason: record.reason.clone(),
            operator_id: record.operator_id,
            operator_display_name: record.operator_display_name.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn sum_by_kind(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<KindTotals> {
        let rows = self.rows.lock().unwrap();
        let mut totals = KindTotals::default();
        for row in rows
            .iter()
            .filter(|r| r.guild_id == guild_id && r.user_id == user_id)
        {
            totals.add(row.kind, i64::from(row.magnitude));
        }
        Ok(totals)
    }

    async fn find_recent(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<MemberRecord>> {
        let rows = self.rows.lock().unwrap();
        let mut matched: Vec<MemberRecord> = rows
            .iter()
            .filter(|r| r.guild_id == guild_id && r.user_id == user_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.id.cmp(&a.id));
        matched.truncate(usize::try_from(limit.max(0)).unwrap_or(0));
        Ok(matched)
    }
}

// ============================================================================
// Settings repository
// ============================================================================

#[derive(Default)]
pub struct MemorySettingsRepository {
    rows: Mutex<HashMap<Snowflake, GuildSettings>>,
}

impl MemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed settings for a guild before the test runs
    pub fn seed(&self, settings: GuildSettings) {
        self.rows.lock().unwrap().insert(settings.guild_id, settings);
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>> {
        Ok(self.rows.lock().unwrap().get(&guild_id).cloned())
    }

    async fn set_offset_enabled(&self, guild_id: Snowflake, enabled: bool) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        rows.entry(guild_id)
            .or_insert_with(|| GuildSettings::defaults(guild_id))
            .offset_enabled = enabled;
        Ok(())
    }

    async fn add_admin(&self, guild_id: Snowflake, admin_id: Snowflake) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let settings = rows
            .entry(guild_id)
            .or_insert_with(|| GuildSettings::defaults(guild_id));
        if !settings.admin_ids.contains(&admin_id) {
            settings.admin_ids.push(admin_id);
        }
        Ok(())
    }

    async fn remove_admin(&self, guild_id: Snowflake, admin_id: Snowflake) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(settings) = rows.get_mut(&guild_id) {
            settings.admin_ids.retain(|id| *id != admin_id);
        }
        Ok(())
    }

    async fn set_log_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        rows.entry(guild_id)
            .or_insert_with(|| GuildSettings::defaults(guild_id))
            .log_channel_id = channel_id;
        Ok(())
    }

    async fn find_with_log_channel(&self) -> RepoResult<Vec<GuildSettings>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.log_channel_id.is_some())
            .cloned()
            .collect())
    }
}

// ============================================================================
// Rule repository
// ============================================================================

#[derive(Default)]
pub struct MemoryRuleRepository {
    rows: Mutex<Vec<EscalationRule>>,
}

impl MemoryRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one rule before the test runs
    pub fn seed(&self, rule: EscalationRule) {
        self.rows.lock().unwrap().push(rule);
    }
}

#[async_trait]
impl RuleRepository for MemoryRuleRepository {
    async fn upsert(&self, rule: &EscalationRule) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        rows.retain(|r| {
            !(r.guild_id == rule.guild_id && r.kind == rule.kind && r.threshold == rule.threshold)
        });
        rows.push(rule.clone());
        Ok(())
    }

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<EscalationRule>> {
        let mut matched: Vec<EscalationRule> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.guild_id == guild_id)
            .cloned()
            .collect();
        matched.sort_by_key(|r| (r.kind.as_str(), r.threshold));
        Ok(matched)
    }

    async fn find_by_guild_kind(
        &self,
        guild_id: Snowflake,
        kind: RecordKind,
    ) -> RepoResult<Vec<EscalationRule>> {
        let mut matched: Vec<EscalationRule> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.guild_id == guild_id && r.kind == kind)
            .cloned()
            .collect();
        matched.sort_by_key(|r| r.threshold);
        Ok(matched)
    }

    async fn delete(
        &self,
        guild_id: Snowflake,
        kind: RecordKind,
        threshold: i32,
    ) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !(r.guild_id == guild_id && r.kind == kind && r.threshold == threshold));
        if rows.len() == before {
            return Err(DomainError::RuleNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Announcement repository
// ============================================================================

#[derive(Default)]
pub struct MemoryAnnouncementRepository {
    rows: Mutex<Vec<Announcement>>,
    next_id: AtomicI64,
}

impl MemoryAnnouncementRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn status_of(&self, id: i64) -> Option<AnnouncementStatus> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.status)
    }
}

#[async_trait]
impl AnnouncementRepository for MemoryAnnouncementRepository {
    async fn create(&self, announcement: &NewAnnouncement) -> RepoResult<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(Announcement {
            id,
            content: announcement.content.clone(),
            run_at: announcement.run_at,
            status: AnnouncementStatus::Pending,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn find_due(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<Announcement>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|a| a.status == AnnouncementStatus::Pending && a.run_at <= now)
            .take(usize::try_from(limit.max(0)).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn mark_status(&self, id: i64, status: AnnouncementStatus) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|a| a.id == id) {
            Some(row) => {
                row.status = status;
                Ok(())
            }
            None => Err(DomainError::AnnouncementNotFound(id)),
        }
    }
}

// ============================================================================
// Platform double
// ============================================================================

/// In-memory stand-in for the chat platform
///
/// Tracks guild membership so kick and ban behave like the real platform:
/// acting on a member who already left yields `NotFound`. The `fail_all`
/// switch makes every action report `Unavailable`.
pub struct FakePlatform {
    owner: Snowflake,
    members: Mutex<HashSet<(Snowflake, Snowflake)>>,
    roles: Mutex<HashMap<(Snowflake, Snowflake), Vec<Snowflake>>>,
    fail_all: AtomicBool,
    pub timeouts: Mutex<Vec<(Snowflake, Snowflake, i32)>>,
    pub kicks: Mutex<Vec<(Snowflake, Snowflake)>>,
    pub bans: Mutex<Vec<(Snowflake, Snowflake)>>,
    pub granted_roles: Mutex<Vec<(Snowflake, Snowflake, Snowflake)>>,
    pub messages: Mutex<Vec<(Snowflake, String)>>,
}

impl FakePlatform {
    pub fn new(owner: Snowflake) -> Self {
        Self {
            owner,
            members: Mutex::new(HashSet::new()),
            roles: Mutex::new(HashMap::new()),
            fail_all: AtomicBool::new(false),
            timeouts: Mutex::new(Vec::new()),
            kicks: Mutex::new(Vec::new()),
            bans: Mutex::new(Vec::new()),
            granted_roles: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn join(&self, guild_id: Snowflake, user_id: Snowflake) {
        self.members.lock().unwrap().insert((guild_id, user_id));
    }

    pub fn give_role(&self, guild_id: Snowflake, user_id: Snowflake, role_id: Snowflake) {
        self.roles
            .lock()
            .unwrap()
            .entry((guild_id, user_id))
            .or_default()
            .push(role_id);
    }

    pub fn set_fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    pub fn timeout_count(&self) -> usize {
        self.timeouts.lock().unwrap().len()
    }

    pub fn kick_count(&self) -> usize {
        self.kicks.lock().unwrap().len()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    fn check_available(&self) -> PlatformResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable("test outage".to_string()));
        }
        Ok(())
    }

    fn require_member(&self, guild_id: Snowflake, user_id: Snowflake) -> PlatformResult<()> {
        if self.members.lock().unwrap().contains(&(guild_id, user_id)) {
            Ok(())
        } else {
            Err(PlatformError::NotFound)
        }
    }
}

#[async_trait]
impl PlatformClient for FakePlatform {
    async fn timeout_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        minutes: i32,
        _reason: &str,
    ) -> PlatformResult<()> {
        self.check_available()?;
        self.require_member(guild_id, user_id)?;
        self.timeouts.lock().unwrap().push((guild_id, user_id, minutes));
        Ok(())
    }

    async fn kick_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        _reason: &str,
    ) -> PlatformResult<()> {
        self.check_available()?;
        self.require_member(guild_id, user_id)?;
        self.members.lock().unwrap().remove(&(guild_id, user_id));
        self.kicks.lock().unwrap().push((guild_id, user_id));
        Ok(())
    }

    async fn ban_member(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        _reason: &str,
    ) -> PlatformResult<()> {
        self.check_available()?;
        self.require_member(guild_id, user_id)?;
        self.members.lock().unwrap().remove(&(guild_id, user_id));
        self.bans.lock().unwrap().push((guild_id, user_id));
        Ok(())
    }

    async fn grant_role(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> PlatformResult<()> {
        self.check_available()?;
        self.require_member(guild_id, user_id)?;
        self.granted_roles
            .lock()
            .unwrap()
            .push((guild_id, user_id, role_id));
        Ok(())
    }

    async fn send_log_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        self.check_available()?;
        self.messages
            .lock()
            .unwrap()
            .push((channel_id, content.to_string()));
        Ok(())
    }
}

#[async_trait]
impl GuildDirectory for FakePlatform {
    async fn owner_of(&self, _guild_id: Snowflake) -> PlatformResult<Snowflake> {
        Ok(self.owner)
    }

    async fn role_ids_of(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> PlatformResult<Vec<Snowflake>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .get(&(guild_id, user_id))
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Everything a pipeline test needs, doubles exposed for assertions
pub struct TestHarness {
    pub context: ServiceContext,
    pub records: Arc<MemoryRecordRepository>,
    pub settings: Arc<MemorySettingsRepository>,
    pub rules: Arc<MemoryRuleRepository>,
    pub announcements: Arc<MemoryAnnouncementRepository>,
    pub platform: Arc<FakePlatform>,
    pub guild_id: Snowflake,
    pub owner_id: Snowflake,
    pub developer_id: Snowflake,
}

impl TestHarness {
    /// Fresh harness with its own guild, owner, and developer identities
    pub fn new() -> Self {
        let guild_id = unique_id();
        let owner_id = unique_id();
        let developer_id = unique_id();

        let records = Arc::new(MemoryRecordRepository::new());
        let settings = Arc::new(MemorySettingsRepository::new());
        let rules = Arc::new(MemoryRuleRepository::new());
        let announcements = Arc::new(MemoryAnnouncementRepository::new());
        let platform = Arc::new(FakePlatform::new(owner_id));

        let context = ServiceContextBuilder::new()
            .record_repo(records.clone())
            .settings_repo(settings.clone())
            .rule_repo(rules.clone())
            .announcement_repo(announcements.clone())
            .platform(platform.clone())
            .directory(platform.clone())
            .jwt_service(Arc::new(JwtService::new("integration-test-secret", 3600)))
            .developer_id(developer_id)
            .build()
            .expect("context build");

        Self {
            context,
            records,
            settings,
            rules,
            announcements,
            platform,
            guild_id,
            owner_id,
            developer_id,
        }
    }

    /// A member who has joined the harness guild
    pub fn join_member(&self) -> Snowflake {
        let user_id = unique_id();
        self.platform.join(self.guild_id, user_id);
        user_id
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
