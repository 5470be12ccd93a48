//! # warden-service
//!
//! Application layer containing the moderation business logic: the
//! permission gate, standing calculator, escalation resolver/executor,
//! record submission orchestration, settings management, and the
//! announcement scheduler.

pub mod dto;
pub mod services;

pub use services::{
    run_announcement_poller, AnnouncementService, EscalationService, ExecutionOutcome,
    GuardedOperation, ModerationService, PermissionService, RecordSubmission, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, SettingsService, StandingService,
    SubmitRecord,
};

pub use dto::{
    AnnouncementScheduledResponse, ApiResponse, EscalationOutcomeResponse, HealthResponse,
    ReadinessResponse, RecordResponse, RuleResponse, ScheduleAnnouncementRequest,
    SetLogChannelRequest, SetOffsetRequest, SettingsResponse, StandingResponse,
    SubmissionResponse, SubmitRecordRequest, UpsertRuleRequest,
};
