use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::patch,
    Json, Router,
};

use crate::api::errors::{is_foreign_key_violation, is_unique_violation, ApiError};
use crate::api::guards::{require_class_ownership, CurrentTeacher};
use crate::api::validation::validate_class_grade;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Enrollment;
use crate::db::types::{EnrollmentStatus, UserRole};
use crate::repositories;
use crate::schemas::enrollment::{
    EnrollmentCreate, EnrollmentGradeUpdate, EnrollmentResponse, EnrollmentStatusUpdate,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:enrollment_id/status", patch(update_status))
        .route("/:enrollment_id/grade", patch(update_grade))
}

/// POST /classes/:class_id/enrollments, wired from the classes router.
pub(crate) async fn enroll_student(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentCreate>,
) -> Result<(StatusCode, Json<EnrollmentResponse>), ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    let student = repositories::users::find_by_id(state.db(), payload.student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    if student.role != UserRole::Student {
        return Err(ApiError::BadRequest("User is not a student".to_string()));
    }

    let enrollment = repositories::enrollments::create(
        state.db(),
        repositories::enrollments::CreateEnrollment {
            class_id,
            student_id: student.id,
            enrolled_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateKey("Student is already enrolled in this class".to_string())
        } else if is_foreign_key_violation(&e) {
            // Class or student row went away between the checks and the insert.
            ApiError::Conflict("Class or student no longer exists".to_string())
        } else {
            ApiError::internal(e, "Failed to enroll student")
        }
    })?;

    Ok((StatusCode::CREATED, Json(EnrollmentResponse::from_db(enrollment))))
}

async fn update_status(
    Path(enrollment_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentStatusUpdate>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let enrollment = fetch_owned_enrollment(&state, &teacher, enrollment_id).await?;

    // Pending is the only state a teacher decision can move away from.
    if enrollment.status != EnrollmentStatus::Pending {
        return Err(ApiError::Conflict(
            "Only pending enrollments can be approved or rejected".to_string(),
        ));
    }
    if payload.status == EnrollmentStatus::Pending {
        return Err(ApiError::Conflict("Enrollment is already pending".to_string()));
    }

    let updated = repositories::enrollments::set_status(state.db(), enrollment_id, payload.status)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update enrollment status"))?;

    Ok(Json(EnrollmentResponse::from_db(updated)))
}

async fn update_grade(
    Path(enrollment_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<EnrollmentGradeUpdate>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    fetch_owned_enrollment(&state, &teacher, enrollment_id).await?;

    validate_class_grade(payload.grade)?;

    let updated = repositories::enrollments::set_grade(
        state.db(),
        enrollment_id,
        payload.grade,
        payload.notes.as_deref(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update enrollment grade"))?;

    Ok(Json(EnrollmentResponse::from_db(updated)))
}

/// Resolves the chain Enrollment -> Class before the ownership rule fires, so
/// a missing enrollment is NotFound while someone else's is Forbidden.
async fn fetch_owned_enrollment(
    state: &AppState,
    teacher: &crate::db::models::User,
    enrollment_id: i64,
) -> Result<Enrollment, ApiError> {
    let enrollment = repositories::enrollments::find_by_id(state.db(), enrollment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load enrollment"))?
        .ok_or_else(|| ApiError::NotFound("Enrollment not found".to_string()))?;

    require_class_ownership(state, teacher, enrollment.class_id).await?;

    Ok(enrollment)
}
