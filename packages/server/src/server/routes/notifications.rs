//! Notification read endpoints.

use axum::extract::{Extension, Path};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::{NotificationId, ProfileId};
use crate::domains::notifications::models::Notification;
use crate::server::app::AppState;
use crate::server::error::ApiResult;

pub async fn list_notifications(
    Extension(state): Extension<AppState>,
    Path(profile_id): Path<ProfileId>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications =
        Notification::find_by_recipient(profile_id, state.deps.db_pool()).await?;
    Ok(Json(notifications))
}

#[derive(Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

pub async fn unread_count(
    Extension(state): Extension<AppState>,
    Path(profile_id): Path<ProfileId>,
) -> ApiResult<Json<UnreadCountResponse>> {
    let unread = Notification::unread_count(profile_id, state.deps.db_pool()).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

#[derive(Deserialize)]
pub struct MarkNotificationReadRequest {
    pub recipient_id: ProfileId,
}

#[derive(Serialize)]
pub struct MarkNotificationReadResponse {
    pub marked: u64,
}

/// Recipient-only read flag. Marking someone else's notification affects zero
/// rows, as does re-marking an already-read one.
pub async fn mark_notification_read(
    Extension(state): Extension<AppState>,
    Path(id): Path<NotificationId>,
    Json(request): Json<MarkNotificationReadRequest>,
) -> ApiResult<Json<MarkNotificationReadResponse>> {
    let marked =
        Notification::mark_read(id, request.recipient_id, state.deps.db_pool()).await?;
    Ok(Json(MarkNotificationReadResponse { marked }))
}
