//! Domain entities

mod announcement;
mod record;
mod rule;
mod settings;
mod standing;

pub use announcement::{Announcement, AnnouncementStatus, NewAnnouncement};
pub use record::{KindTotals, MemberRecord, NewMemberRecord, RecordKind};
pub use rule::{EscalationAction, EscalationRule};
pub use settings::GuildSettings;
pub use standing::Standing;
