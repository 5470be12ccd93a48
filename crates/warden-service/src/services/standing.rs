//! Standing computation
//!
//! A member's standing is never stored. It is recomputed from the ledger
//! on every read, so the ledger stays the single source of truth.

use tracing::instrument;

use warden_core::{Snowflake, Standing};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Service computing a member's current standing from the ledger
pub struct StandingService<'a> {
    context: &'a ServiceContext,
}

impl<'a> StandingService<'a> {
    pub fn new(context: &'a ServiceContext) -> Self {
        Self { context }
    }

    /// Compute the current standing of one member
    ///
    /// A member with no records has an all-zero standing; this is not an
    /// error.
    #[instrument(skip(self), fields(guild_id = %guild_id, user_id = %user_id))]
    pub async fn member_standing(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Standing> {
        let settings = self.context.settings_or_default(guild_id).await?;
        let totals = self
            .context
            .record_repo()
            .sum_by_kind(guild_id, user_id)
            .await?;
        Ok(Standing::from_totals(totals, settings.offset_enabled))
    }
}
