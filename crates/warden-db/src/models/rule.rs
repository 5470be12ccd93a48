//! Escalation rule database model

use sqlx::FromRow;

use warden_core::{DomainError, EscalationAction, EscalationRule, RecordKind, Snowflake};

/// Database model for the escalation_rules table
#[derive(Debug, Clone, FromRow)]
pub struct EscalationRuleModel {
    pub guild_id: i64,
    pub kind: String,
    pub threshold: i32,
    pub action: String,
    pub timeout_minutes: Option<i32>,
    pub role_id: Option<i64>,
}

impl TryFrom<EscalationRuleModel> for EscalationRule {
    type Error = DomainError;

    fn try_from(model: EscalationRuleModel) -> Result<Self, Self::Error> {
        // Revalidates through the entity constructor so a hand-edited row
        // with missing action parameters cannot reach the executor.
        EscalationRule::new(
            Snowflake::new(model.guild_id),
            RecordKind::parse(&model.kind)?,
            model.threshold,
            EscalationAction::parse(&model.action)?,
            model.timeout_minutes,
            model.role_id.map(Snowflake::new),
        )
    }
}
