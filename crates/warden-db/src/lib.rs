//! # warden-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `warden-core`. It handles:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity decoding with constructor-level validation
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_db::pool::{create_pool, DatabaseConfig};
//! use warden_db::PgRecordRepository;
//! use warden_core::RecordRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let record_repo = PgRecordRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAnnouncementRepository, PgRecordRepository, PgRuleRepository, PgSettingsRepository,
};
