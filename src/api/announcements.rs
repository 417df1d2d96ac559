use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::delete,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{require_class_ownership, CurrentTeacher};
use crate::api::validation::require_non_empty;
use crate::core::state::AppState;
use crate::core::time::{parse_rfc3339, primitive_now_utc};
use crate::repositories;
use crate::schemas::announcement::{AnnouncementCreate, AnnouncementResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/:announcement_id", delete(delete_announcement))
}

/// GET /classes/:class_id/announcements, wired from the classes router.
pub(crate) async fn list_for_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<AnnouncementResponse>>, ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    let announcements = repositories::announcements::list_active_by_class(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list announcements"))?;

    Ok(Json(announcements.into_iter().map(AnnouncementResponse::from_db).collect()))
}

/// POST /classes/:class_id/announcements, wired from the classes router.
pub(crate) async fn create_for_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<AnnouncementCreate>,
) -> Result<(StatusCode, Json<AnnouncementResponse>), ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    require_non_empty(&payload.title, "title")?;
    require_non_empty(&payload.content, "content")?;

    let expiry_date = match &payload.expiry_date {
        Some(raw) => Some(parse_rfc3339(raw).ok_or_else(|| {
            ApiError::BadRequest("expiry_date must be an RFC3339 timestamp".to_string())
        })?),
        None => None,
    };

    let announcement = repositories::announcements::create(
        state.db(),
        repositories::announcements::CreateAnnouncement {
            class_id,
            title: &payload.title,
            content: &payload.content,
            created_by: teacher.id,
            created_at: primitive_now_utc(),
            is_important: payload.is_important,
            expiry_date,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create announcement"))?;

    Ok((StatusCode::CREATED, Json(AnnouncementResponse::from_db(announcement))))
}

async fn delete_announcement(
    Path(announcement_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let announcement = repositories::announcements::find_by_id(state.db(), announcement_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load announcement"))?
        .ok_or_else(|| ApiError::NotFound("Announcement not found".to_string()))?;

    require_class_ownership(&state, &teacher, announcement.class_id).await?;

    repositories::announcements::delete(state.db(), announcement.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete announcement"))?;

    Ok(StatusCode::NO_CONTENT)
}
