//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use warden_core::DomainError;

/// Convert SQLx error to DomainError
///
/// Every storage failure surfaces as a retryable `DatabaseError`; the insert
/// path is all-or-nothing, so the caller never sees a partial record.
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "rule not found" error
pub fn rule_not_found() -> DomainError {
    DomainError::RuleNotFound
}

/// Create an "announcement not found" error
pub fn announcement_not_found(id: i64) -> DomainError {
    DomainError::AnnouncementNotFound(id)
}
