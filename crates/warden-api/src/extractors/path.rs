//! Path parameter extractors
//!
//! Type-safe extraction of Snowflake IDs and rule keys from path
//! parameters. IDs travel as strings in URLs.

use serde::Deserialize;
use warden_core::{RecordKind, Snowflake};

use crate::response::ApiError;

fn parse_id(raw: &str, name: &str) -> Result<Snowflake, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid_path(format!("Invalid {name} format")))
}

/// Path parameters with guild_id
#[derive(Debug, Deserialize)]
pub struct GuildIdPath {
    pub guild_id: String,
}

impl GuildIdPath {
    /// Parse guild_id as Snowflake
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }
}

/// Path parameters with guild_id and user_id
#[derive(Debug, Deserialize)]
pub struct GuildUserPath {
    pub guild_id: String,
    pub user_id: String,
}

impl GuildUserPath {
    /// Parse guild_id as Snowflake
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }

    /// Parse user_id as Snowflake
    pub fn user_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.user_id, "user_id")
    }
}

/// Path parameters with guild_id and admin_id
#[derive(Debug, Deserialize)]
pub struct GuildAdminPath {
    pub guild_id: String,
    pub admin_id: String,
}

impl GuildAdminPath {
    /// Parse guild_id as Snowflake
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }

    /// Parse admin_id as Snowflake
    pub fn admin_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.admin_id, "admin_id")
    }
}

/// Path parameters identifying one escalation rule
#[derive(Debug, Deserialize)]
pub struct RulePath {
    pub guild_id: String,
    pub kind: String,
    pub threshold: i32,
}

impl RulePath {
    /// Parse guild_id as Snowflake
    pub fn guild_id(&self) -> Result<Snowflake, ApiError> {
        parse_id(&self.guild_id, "guild_id")
    }

    /// Parse the record kind segment
    pub fn kind(&self) -> Result<RecordKind, ApiError> {
        RecordKind::parse(&self.kind)
            .map_err(|_| ApiError::invalid_path("Invalid kind: expected warning or commendation"))
    }
}
