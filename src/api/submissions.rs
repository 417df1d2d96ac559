use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::api::assignments::fetch_owned_assignment;
use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::{CurrentTeacher, CurrentUser};
use crate::api::validation::{sanitized_filename, validate_submission_score};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Submission, User};
use crate::db::types::{EnrollmentStatus, SubmissionStatus, UserRole};
use crate::repositories;
use crate::schemas::submission::{GradingBoardEntry, SubmissionGrade, SubmissionResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:submission_id/grade", post(grade_submission))
        .route("/:submission_id/return", post(return_submission))
}

/// GET /assignments/:assignment_id/submissions, wired from the assignments
/// router. Every approved student appears, submitted or not.
pub(crate) async fn grading_board(
    Path(assignment_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<GradingBoardEntry>>, ApiError> {
    let assignment = fetch_owned_assignment(&state, &teacher, assignment_id).await?;

    let rows =
        repositories::submissions::grading_board(state.db(), assignment.id, assignment.class_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load grading board"))?;

    Ok(Json(rows.into_iter().map(GradingBoardEntry::from_row).collect()))
}

/// POST /assignments/:assignment_id/submissions, wired from the assignments
/// router. Multipart with an optional `content` text field and an optional
/// `file`; at least one must be present.
pub(crate) async fn submit(
    Path(assignment_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    if user.role != UserRole::Student {
        return Err(ApiError::Forbidden("Only students can submit work"));
    }

    let assignment = repositories::assignments::find_by_id(state.db(), assignment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    if !assignment.is_published {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    require_approved_enrollment(&state, &user, assignment.class_id).await?;

    let now = primitive_now_utc();
    let is_late = now > assignment.due_date;
    if is_late && !assignment.allow_late_submission {
        return Err(ApiError::BadRequest(
            "The deadline has passed and late submissions are not allowed".to_string(),
        ));
    }

    let mut content: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;
    let max_bytes = state.settings().storage().max_upload_size_bytes();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            filename = field.file_name().map(|s| s.to_string());
            content_type = field.content_type().map(|s| s.to_string());
            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
            {
                if bytes.len() + chunk.len() > max_bytes {
                    return Err(ApiError::BadRequest(format!(
                        "File size exceeds {}MB limit",
                        state.settings().storage().max_upload_size_mb
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }
            file_bytes = Some(bytes);
        } else if name == "content" {
            let text = field
                .text()
                .await
                .map_err(|_| ApiError::BadRequest("Invalid content field".to_string()))?;
            content = Some(text);
        }
    }

    let has_content = content.as_deref().is_some_and(|text| !text.trim().is_empty());
    let has_file = file_bytes.as_ref().is_some_and(|bytes| !bytes.is_empty());
    if !has_content && !has_file {
        return Err(ApiError::BadRequest("Submission requires content or a file".to_string()));
    }

    let mut file_key: Option<String> = None;
    let mut original_filename: Option<String> = None;
    let mut file_size: Option<i64> = None;

    if has_file {
        let bytes = file_bytes.unwrap_or_default();
        let raw_name = filename.unwrap_or_else(|| "submission.bin".to_string());
        let content_type =
            content_type.unwrap_or_else(|| "application/octet-stream".to_string());

        let storage = state.storage().ok_or_else(|| {
            ApiError::ServiceUnavailable("File storage is not configured".to_string())
        })?;

        let object_id = Uuid::new_v4().to_string();
        let key = format!(
            "submissions/{}/{}_{}",
            assignment_id,
            object_id,
            sanitized_filename(&raw_name)
        );

        let (size, _hash) = storage
            .upload_bytes(&key, &content_type, bytes)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to upload submission file"))?;

        file_key = Some(key);
        original_filename = Some(raw_name);
        file_size = Some(size);
    }

    let created = repositories::submissions::create(
        state.db(),
        repositories::submissions::CreateSubmission {
            assignment_id,
            student_id: user.id,
            content: content.as_deref().filter(|text| !text.trim().is_empty()),
            file_key: file_key.as_deref(),
            original_filename: original_filename.as_deref(),
            file_size,
            submitted_at: now,
            is_late,
        },
    )
    .await;

    let submission = match created {
        Ok(submission) => submission,
        Err(e) => {
            // The object was stored before the insert; do not leave it orphaned.
            if let (Some(key), Some(storage)) = (file_key.as_deref(), state.storage()) {
                if let Err(cleanup_err) = storage.delete_object(key).await {
                    tracing::warn!(error = %cleanup_err, key, "Failed to remove orphaned submission file");
                }
            }
            if is_unique_violation(&e) {
                return Err(ApiError::DuplicateKey(
                    "You have already submitted this assignment".to_string(),
                ));
            }
            return Err(ApiError::internal(e, "Failed to store submission"));
        }
    };

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(submission))))
}

async fn grade_submission(
    Path(submission_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<SubmissionGrade>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let (submission, assignment) = fetch_owned_submission(&state, &teacher, submission_id).await?;

    // Bounds are checked before any write; an out-of-range score leaves the
    // submission untouched.
    validate_submission_score(payload.score, assignment.max_score)?;

    let graded = repositories::submissions::grade(
        state.db(),
        submission.id,
        payload.score,
        payload.feedback.as_deref(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to grade submission"))?;

    Ok(Json(SubmissionResponse::from_db(graded)))
}

async fn return_submission(
    Path(submission_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let (submission, _assignment) = fetch_owned_submission(&state, &teacher, submission_id).await?;

    if submission.status != SubmissionStatus::Graded {
        return Err(ApiError::Conflict("Only graded submissions can be returned".to_string()));
    }

    let returned = repositories::submissions::set_status(
        state.db(),
        submission.id,
        SubmissionStatus::Returned,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to return submission"))?;

    Ok(Json(SubmissionResponse::from_db(returned)))
}

/// Resolves the chain Submission -> Assignment -> Class before the ownership
/// rule fires.
async fn fetch_owned_submission(
    state: &AppState,
    teacher: &User,
    submission_id: i64,
) -> Result<(Submission, crate::db::models::Assignment), ApiError> {
    let submission = repositories::submissions::find_by_id(state.db(), submission_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load submission"))?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    let assignment = fetch_owned_assignment(state, teacher, submission.assignment_id).await?;

    Ok((submission, assignment))
}

async fn require_approved_enrollment(
    state: &AppState,
    student: &User,
    class_id: i64,
) -> Result<(), ApiError> {
    let status =
        repositories::enrollments::find_status_for_student(state.db(), class_id, student.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;

    match status {
        Some(EnrollmentStatus::Approved) => Ok(()),
        _ => Err(ApiError::Forbidden("You are not enrolled in this class")),
    }
}

#[cfg(test)]
mod tests;
