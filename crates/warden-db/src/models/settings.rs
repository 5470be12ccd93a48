//! Guild settings database model

use sqlx::FromRow;

use warden_core::{GuildSettings, Snowflake};

/// Database model for the guild_settings table
#[derive(Debug, Clone, FromRow)]
pub struct GuildSettingsModel {
    pub guild_id: i64,
    pub offset_enabled: bool,
    pub admin_ids: Vec<i64>,
    pub log_channel_id: Option<i64>,
}

impl From<GuildSettingsModel> for GuildSettings {
    fn from(model: GuildSettingsModel) -> Self {
        GuildSettings {
            guild_id: Snowflake::new(model.guild_id),
            offset_enabled: model.offset_enabled,
            admin_ids: model.admin_ids.into_iter().map(Snowflake::new).collect(),
            log_channel_id: model.log_channel_id.map(Snowflake::new),
        }
    }
}
