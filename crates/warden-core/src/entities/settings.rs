//! Guild settings entity - per-guild moderation configuration

use crate::value_objects::Snowflake;

/// Per-guild configuration read by the scoring pipeline
///
/// Mutated only through the settings-management surface. A guild with no
/// stored row behaves as [`GuildSettings::defaults`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSettings {
    pub guild_id: Snowflake,
    /// When enabled, warnings and commendations cancel each other 1:1
    pub offset_enabled: bool,
    /// Delegated admins: member IDs and role IDs share this one set
    pub admin_ids: Vec<Snowflake>,
    /// Audit notification destination, if configured
    pub log_channel_id: Option<Snowflake>,
}

impl GuildSettings {
    /// Settings for a guild with no stored row
    #[must_use]
    pub fn defaults(guild_id: Snowflake) -> Self {
        Self {
            guild_id,
            offset_enabled: false,
            admin_ids: Vec::new(),
            log_channel_id: None,
        }
    }

    /// Check whether an ID (member or role) is in the delegated-admin set
    #[must_use]
    pub fn is_delegated(&self, id: Snowflake) -> bool {
        self.admin_ids.contains(&id)
    }

    /// Check whether any of the given IDs is in the delegated-admin set
    #[must_use]
    pub fn is_any_delegated<I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = Snowflake>,
    {
        ids.into_iter().any(|id| self.is_delegated(id))
    }
}
