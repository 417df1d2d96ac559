use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use validator::Validate;

use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::CurrentAdmin;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::user::{AdminUserCreate, UserResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", post(create_user))
}

async fn create_user(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AdminUserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            email: payload.email.trim(),
            hashed_password,
            full_name: &payload.full_name,
            role: payload.role,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateKey("User with this email already exists".to_string())
        } else {
            ApiError::internal(e, "Failed to create user")
        }
    })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from_db(user))))
}

#[cfg(test)]
mod tests;
