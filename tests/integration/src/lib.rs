//! Integration test utilities for the moderation pipeline
//!
//! This crate provides in-memory repository and platform doubles so the
//! full submit/resolve/execute pipeline can be exercised without a
//! database or a live chat platform.

pub mod fixtures;

pub use fixtures::*;
