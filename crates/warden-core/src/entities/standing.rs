//! Standing - a member's derived warning/commendation totals

use serde::Serialize;

use super::record::{KindTotals, RecordKind};

/// A member's current standing in one guild
///
/// Derived fresh from the full ledger on every scoring event; never
/// persisted. Raw totals are carried alongside the offset-adjusted values so
/// record listings can show both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub warning_total: i64,
    pub commendation_total: i64,
    pub effective_warning: i64,
    pub effective_commendation: i64,
}

impl Standing {
    /// Compute standing from ledger totals under the guild's offset policy
    ///
    /// With offsetting disabled the effective values equal the raw totals.
    /// With offsetting enabled, warnings and commendations cancel 1:1 and at
    /// least one effective value is zero. Effective values are never
    /// negative.
    #[must_use]
    pub fn from_totals(totals: KindTotals, offset_enabled: bool) -> Self {
        let (effective_warning, effective_commendation) = if offset_enabled {
            (
                (totals.warning - totals.commendation).max(0),
                (totals.commendation - totals.warning).max(0),
            )
        } else {
            (totals.warning, totals.commendation)
        };

        Self {
            warning_total: totals.warning,
            commendation_total: totals.commendation,
            effective_warning,
            effective_commendation,
        }
    }

    /// Effective count for one kind
    #[must_use]
    pub const fn effective_for(&self, kind: RecordKind) -> i64 {
        match kind {
            RecordKind::Warning => self.effective_warning,
            RecordKind::Commendation => self.effective_commendation,
        }
    }
}
