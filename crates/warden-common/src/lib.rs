//! # warden-common
//!
//! Shared utilities including configuration, error handling, dashboard
//! session tokens, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService};
pub use config::{
    AnnouncementConfig, AppConfig, AppSettings, ConfigError, DatabaseConfig, DiscordConfig,
    Environment, JwtConfig, ServerConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
