use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{require_class_ownership, CurrentTeacher};
use crate::api::submissions;
use crate::api::validation::{require_non_empty, validate_max_score};
use crate::core::state::AppState;
use crate::core::time::{parse_rfc3339, primitive_now_utc};
use crate::db::models::{Assignment, User};
use crate::repositories;
use crate::schemas::assignment::{
    AssignmentCreate, AssignmentDetailsResponse, AssignmentResponse, AssignmentUpdate,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/:assignment_id",
            get(get_assignment).patch(update_assignment).delete(delete_assignment),
        )
        .route(
            "/:assignment_id/submissions",
            get(submissions::grading_board).post(submissions::submit),
        )
}

/// GET /classes/:class_id/assignments, wired from the classes router.
pub(crate) async fn list_for_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssignmentResponse>>, ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    let assignments = repositories::assignments::list_by_class(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;

    Ok(Json(assignments.into_iter().map(AssignmentResponse::from_db).collect()))
}

/// POST /classes/:class_id/assignments, wired from the classes router.
pub(crate) async fn create_for_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    require_non_empty(&payload.title, "title")?;
    validate_max_score(payload.max_score)?;
    let due_date = parse_rfc3339(&payload.due_date)
        .ok_or_else(|| ApiError::BadRequest("due_date must be an RFC3339 timestamp".to_string()))?;

    let now = primitive_now_utc();
    let assignment = repositories::assignments::create(
        state.db(),
        repositories::assignments::CreateAssignment {
            class_id,
            title: &payload.title,
            description: payload.description.as_deref(),
            instructions: payload.instructions.as_deref(),
            due_date,
            max_score: payload.max_score,
            assignment_type: payload.assignment_type,
            is_published: payload.is_published,
            allow_late_submission: payload.allow_late_submission,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assignment"))?;

    Ok((StatusCode::CREATED, Json(AssignmentResponse::from_db(assignment))))
}

async fn get_assignment(
    Path(assignment_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<AssignmentDetailsResponse>, ApiError> {
    let assignment = fetch_owned_assignment(&state, &teacher, assignment_id).await?;

    let enrolled_count =
        repositories::enrollments::count_approved_by_class(state.db(), assignment.class_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to count enrollments"))?;
    let submitted_count = repositories::submissions::count_by_assignment(state.db(), assignment.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count submissions"))?;

    Ok(Json(AssignmentDetailsResponse {
        assignment: AssignmentResponse::from_db(assignment),
        enrolled_count,
        submitted_count,
    }))
}

async fn update_assignment(
    Path(assignment_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentUpdate>,
) -> Result<Json<AssignmentResponse>, ApiError> {
    fetch_owned_assignment(&state, &teacher, assignment_id).await?;

    if let Some(title) = &payload.title {
        require_non_empty(title, "title")?;
    }
    if let Some(max_score) = payload.max_score {
        validate_max_score(max_score)?;
    }
    let due_date = match &payload.due_date {
        Some(raw) => Some(parse_rfc3339(raw).ok_or_else(|| {
            ApiError::BadRequest("due_date must be an RFC3339 timestamp".to_string())
        })?),
        None => None,
    };

    let updated = repositories::assignments::update(
        state.db(),
        assignment_id,
        repositories::assignments::UpdateAssignment {
            title: payload.title,
            description: payload.description,
            instructions: payload.instructions,
            due_date,
            max_score: payload.max_score,
            assignment_type: payload.assignment_type,
            is_published: payload.is_published,
            allow_late_submission: payload.allow_late_submission,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update assignment"))?;

    Ok(Json(AssignmentResponse::from_db(updated)))
}

async fn delete_assignment(
    Path(assignment_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    fetch_owned_assignment(&state, &teacher, assignment_id).await?;

    // Student work must not disappear with a single assignment delete; only a
    // class delete cascades through submissions. The repository guards the
    // delete itself, so a submission racing past this handler still blocks it.
    let deleted = repositories::assignments::delete_if_no_submissions(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assignment"))?;
    if !deleted {
        return Err(ApiError::Conflict(
            "Cannot delete assignment: students have submitted work".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Resolves the chain Assignment -> Class before the ownership rule fires.
pub(crate) async fn fetch_owned_assignment(
    state: &AppState,
    teacher: &User,
    assignment_id: i64,
) -> Result<Assignment, ApiError> {
    let assignment = repositories::assignments::find_by_id(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    require_class_ownership(state, teacher, assignment.class_id).await?;

    Ok(assignment)
}

#[cfg(test)]
mod tests;
