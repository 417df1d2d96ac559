use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::{require_class_ownership, CurrentTeacher};
use crate::api::validation::require_non_empty;
use crate::api::{announcements, assignments, enrollments, materials};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::class::{ClassCreate, ClassResponse, ClassUpdate};
use crate::schemas::enrollment::RosterEntryResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes).post(create_class))
        .route("/:class_id", get(get_class).patch(update_class).delete(delete_class))
        .route("/:class_id/roster", get(roster))
        .route("/:class_id/enrollments", post(enrollments::enroll_student))
        .route(
            "/:class_id/assignments",
            get(assignments::list_for_class).post(assignments::create_for_class),
        )
        .route(
            "/:class_id/materials",
            get(materials::list_for_class).post(materials::upload_for_class),
        )
        .route(
            "/:class_id/announcements",
            get(announcements::list_for_class).post(announcements::create_for_class),
        )
}

async fn list_classes(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let classes = repositories::classes::list_by_teacher(state.db(), teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;

    Ok(Json(classes.into_iter().map(ClassResponse::from_db).collect()))
}

async fn create_class(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<ClassCreate>,
) -> Result<(StatusCode, Json<ClassResponse>), ApiError> {
    require_non_empty(&payload.name, "name")?;
    require_non_empty(&payload.code, "code")?;
    require_non_empty(&payload.semester, "semester")?;
    require_non_empty(&payload.academic_year, "academic_year")?;

    let now = primitive_now_utc();
    let class = repositories::classes::create(
        state.db(),
        repositories::classes::CreateClass {
            name: &payload.name,
            code: payload.code.trim(),
            description: payload.description.as_deref(),
            teacher_id: teacher.id,
            semester: &payload.semester,
            academic_year: &payload.academic_year,
            max_students: payload.max_students,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateKey("Class with this code already exists".to_string())
        } else {
            ApiError::internal(e, "Failed to create class")
        }
    })?;

    Ok((StatusCode::CREATED, Json(ClassResponse::from_db(class))))
}

async fn get_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<ClassResponse>, ApiError> {
    let class = require_class_ownership(&state, &teacher, class_id).await?;
    Ok(Json(ClassResponse::from_db(class)))
}

async fn update_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<ClassUpdate>,
) -> Result<Json<ClassResponse>, ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    if let Some(name) = &payload.name {
        require_non_empty(name, "name")?;
    }
    if let Some(code) = &payload.code {
        require_non_empty(code, "code")?;
    }

    let class = repositories::classes::update(
        state.db(),
        class_id,
        repositories::classes::UpdateClass {
            name: payload.name,
            code: payload.code.map(|code| code.trim().to_string()),
            description: payload.description,
            semester: payload.semester,
            academic_year: payload.academic_year,
            max_students: payload.max_students,
            is_active: payload.is_active,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateKey("Class with this code already exists".to_string())
        } else {
            ApiError::internal(e, "Failed to update class")
        }
    })?;

    Ok(Json(ClassResponse::from_db(class)))
}

async fn delete_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    repositories::classes::delete(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete class"))?;

    Ok(StatusCode::NO_CONTENT)
}

async fn roster(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<RosterEntryResponse>>, ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    let rows = repositories::enrollments::roster(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load roster"))?;

    Ok(Json(rows.into_iter().map(RosterEntryResponse::from_row).collect()))
}
