//! Database models (SQLx `FromRow` structs)
//!
//! Models mirror table layouts with raw column types; decoding into domain
//! entities happens through `TryFrom`, so malformed rows are rejected at the
//! storage boundary instead of flowing onward as loose data.

mod announcement;
mod record;
mod rule;
mod settings;

pub use announcement::AnnouncementModel;
pub use record::MemberRecordModel;
pub use rule::EscalationRuleModel;
pub use settings::GuildSettingsModel;
