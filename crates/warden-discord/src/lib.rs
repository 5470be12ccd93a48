//! # warden-discord
//!
//! Discord REST (API v10) adapter implementing the platform traits the
//! moderation pipeline depends on: escalation actions, log-channel
//! messaging, and the identity lookups behind the permission gate.

pub mod client;

pub use client::DiscordClient;
