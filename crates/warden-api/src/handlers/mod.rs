//! Request handlers organized by domain

pub mod announcements;
pub mod health;
pub mod records;
pub mod rules;
pub mod settings;
