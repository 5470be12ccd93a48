//! PostgreSQL repository implementations

mod announcement;
mod error;
mod record;
mod rule;
mod settings;

pub use announcement::PgAnnouncementRepository;
pub use record::PgRecordRepository;
pub use rule::PgRuleRepository;
pub use settings::PgSettingsRepository;
