//! Member record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use warden_core::{DomainError, MemberRecord, RecordKind, Snowflake};

/// Database model for the member_records table
#[derive(Debug, Clone, FromRow)]
pub struct MemberRecordModel {
    pub id: i64,
    pub guild_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub kind: String,
    pub magnitude: i32,
    pub reason: String,
    pub operator_id: i64,
    pub operator_name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<MemberRecordModel> for MemberRecord {
    type Error = DomainError;

    fn try_from(model: MemberRecordModel) -> Result<Self, Self::Error> {
        Ok(MemberRecord {
            id: model.id,
            guild_id: Snowflake::new(model.guild_id),
            user_id: Snowflake::new(model.user_id),
            user_display_name: model.user_name,
            kind: RecordKind::parse(&model.kind)?,
            magnitude: model.magnitude,
            reason: model.reason,
            operator_id: Snowflake::new(model.operator_id),
            operator_display_name: model.operator_name,
            created_at: model.created_at,
        })
    }
}
