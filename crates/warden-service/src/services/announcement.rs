//! Scheduled global announcements
//!
//! The developer can queue an announcement for a future time; a background
//! poller delivers due announcements to every guild with a configured log
//! channel. Delivery state lives in the announcements table, so a restart
//! picks up anything still pending.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use warden_core::{Announcement, AnnouncementStatus, NewAnnouncement, Snowflake};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// How many due announcements one poll tick will pick up
const DELIVERY_BATCH: i64 = 16;

/// Service scheduling and delivering global announcements
pub struct AnnouncementService<'a> {
    context: &'a ServiceContext,
}

impl<'a> AnnouncementService<'a> {
    pub fn new(context: &'a ServiceContext) -> Self {
        Self { context }
    }

    /// Queue an announcement for delivery at `run_at`
    ///
    /// Developer only. A `run_at` in the past is accepted; the next poll
    /// tick delivers it immediately.
    #[instrument(skip(self, content), fields(actor_id = %actor_id, run_at = %run_at))]
    pub async fn schedule(
        &self,
        actor_id: Snowflake,
        content: String,
        run_at: DateTime<Utc>,
    ) -> ServiceResult<i64> {
        if actor_id != self.context.developer_id() {
            return Err(ServiceError::permission_denied(
                "only the bot developer may schedule announcements",
            ));
        }
        let announcement = NewAnnouncement::new(content, run_at)?;
        let id = self
            .context
            .announcement_repo()
            .create(&announcement)
            .await?;
        info!(id, "announcement scheduled");
        Ok(id)
    }

    /// Deliver every announcement whose `run_at` has passed
    ///
    /// Returns the number of announcements that reached a terminal state
    /// this tick. An announcement is `sent` when at least one guild
    /// received it, or when no guild has a log channel to receive it;
    /// it is `failed` only when every configured guild refused delivery.
    #[instrument(skip(self))]
    pub async fn deliver_due(&self, now: DateTime<Utc>) -> ServiceResult<usize> {
        let due = self
            .context
            .announcement_repo()
            .find_due(now, DELIVERY_BATCH)
            .await?;
        if due.is_empty() {
            return Ok(0);
        }

        let targets: Vec<(Snowflake, Snowflake)> = self
            .context
            .settings_repo()
            .find_with_log_channel()
            .await?
            .into_iter()
            .filter_map(|settings| {
                settings
                    .log_channel_id
                    .map(|channel_id| (settings.guild_id, channel_id))
            })
            .collect();

        let mut delivered = 0;
        for announcement in due {
            let status = self.deliver_one(&announcement, &targets).await;
            self.context
                .announcement_repo()
                .mark_status(announcement.id, status)
                .await?;
            delivered += 1;
        }
        Ok(delivered)
    }

    async fn deliver_one(
        &self,
        announcement: &Announcement,
        channels: &[(Snowflake, Snowflake)],
    ) -> AnnouncementStatus {
        let mut successes = 0usize;
        for (guild_id, channel_id) in channels {
            match self
                .context
                .platform()
                .send_log_message(*channel_id, &announcement.content)
                .await
            {
                Ok(()) => successes += 1,
                Err(err) => {
                    warn!(
                        announcement_id = announcement.id,
                        guild_id = %guild_id,
                        channel_id = %channel_id,
                        error = %err,
                        "announcement delivery to guild failed"
                    );
                }
            }
        }

        if successes > 0 || channels.is_empty() {
            info!(
                announcement_id = announcement.id,
                successes,
                targets = channels.len(),
                "announcement delivered"
            );
            AnnouncementStatus::Sent
        } else {
            error!(
                announcement_id = announcement.id,
                targets = channels.len(),
                "announcement failed in every guild"
            );
            AnnouncementStatus::Failed
        }
    }
}

/// Run the delivery poller until the process exits
///
/// Poll errors are logged and the loop keeps going; a transient database
/// outage must not kill delivery for good.
pub async fn run_announcement_poller(context: ServiceContext, poll_interval: Duration) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let service = AnnouncementService::new(&context);
        match service.deliver_due(Utc::now()).await {
            Ok(0) => {}
            Ok(count) => info!(count, "announcement poll tick delivered"),
            Err(err) => error!(error = %err, "announcement poll tick failed"),
        }
    }
}
