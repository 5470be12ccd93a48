//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod announcement;
pub mod context;
pub mod error;
pub mod escalation;
pub mod moderation;
pub mod permission;
pub mod settings;
pub mod standing;

// Re-export all services for convenience
pub use announcement::{run_announcement_poller, AnnouncementService};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use escalation::{EscalationService, ExecutionOutcome};
pub use moderation::{ModerationService, RecordSubmission, SubmitRecord};
pub use permission::{GuardedOperation, PermissionService};
pub use settings::SettingsService;
pub use standing::StandingService;
