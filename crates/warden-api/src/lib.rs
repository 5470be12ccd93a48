//! # warden-api
//!
//! Dashboard REST API server built with Axum. Exposes the moderation
//! ledger, guild settings, escalation rules, and announcement scheduling
//! over a bearer-JWT authenticated JSON surface.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::run;
