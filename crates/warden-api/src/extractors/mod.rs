//! Request extractors
//!
//! Authentication, validated JSON bodies, and typed path parameters.

pub mod auth;
pub mod path;
pub mod validated;

pub use auth::AuthUser;
pub use path::{GuildAdminPath, GuildIdPath, GuildUserPath, RulePath};
pub use validated::ValidatedJson;
