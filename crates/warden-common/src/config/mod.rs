//! Configuration structs

mod app_config;

pub use app_config::{
    AnnouncementConfig, AppConfig, AppSettings, ConfigError, DatabaseConfig, DiscordConfig,
    Environment, JwtConfig, ServerConfig,
};
