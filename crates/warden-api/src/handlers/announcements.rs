//! Announcement handlers
//!
//! Endpoint for scheduling global announcements (developer only; the
//! service enforces the restriction).

use axum::{extract::State, Json};
use warden_service::{
    AnnouncementScheduledResponse, AnnouncementService, ScheduleAnnouncementRequest,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Schedule a global announcement
///
/// POST /announcements
pub async fn schedule_announcement(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ScheduleAnnouncementRequest>,
) -> ApiResult<Created<Json<AnnouncementScheduledResponse>>> {
    let service = AnnouncementService::new(state.service_context());
    let id = service
        .schedule(auth.user_id, request.content, request.run_at)
        .await?;
    Ok(Created(Json(AnnouncementScheduledResponse { id })))
}
