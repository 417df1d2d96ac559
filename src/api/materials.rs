use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_class_ownership, CurrentTeacher};
use crate::api::validation::{require_non_empty, sanitized_filename, validate_material_upload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{CourseMaterial, User};
use crate::repositories;
use crate::schemas::material::{DownloadUrlResponse, MaterialResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/:material_id/download-url", get(download_url))
        .route("/:material_id", delete(delete_material))
}

/// GET /classes/:class_id/materials, wired from the classes router.
pub(crate) async fn list_for_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<MaterialResponse>>, ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    let materials = repositories::materials::list_by_class(state.db(), class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list materials"))?;

    Ok(Json(materials.into_iter().map(MaterialResponse::from_db).collect()))
}

/// POST /classes/:class_id/materials, wired from the classes router.
/// Multipart with `title`, optional `description` and a required `file`.
/// Bytes are stored before the metadata row, so a storage failure leaves no
/// record behind.
pub(crate) async fn upload_for_class(
    Path(class_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MaterialResponse>), ApiError> {
    require_class_ownership(&state, &teacher, class_id).await?;

    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
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
        match name.as_str() {
            "file" => {
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
            }
            "title" => {
                title = Some(field.text().await.map_err(|_| {
                    ApiError::BadRequest("Invalid title field".to_string())
                })?);
            }
            "description" => {
                description = Some(field.text().await.map_err(|_| {
                    ApiError::BadRequest("Invalid description field".to_string())
                })?);
            }
            _ => {}
        }
    }

    let title = title.ok_or_else(|| ApiError::BadRequest("title is required".to_string()))?;
    require_non_empty(&title, "title")?;

    let file_bytes = file_bytes
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let raw_name =
        filename.ok_or_else(|| ApiError::BadRequest("File must have a name".to_string()))?;
    let extension =
        validate_material_upload(&raw_name, &state.settings().storage().allowed_material_extensions)?;
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let storage = state.storage().ok_or_else(|| {
        ApiError::ServiceUnavailable("File storage is not configured".to_string())
    })?;

    let object_id = Uuid::new_v4().to_string();
    let key = format!("materials/{}/{}_{}", class_id, object_id, sanitized_filename(&raw_name));

    let (file_size, _hash) = storage
        .upload_bytes(&key, &content_type, file_bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to upload material file"))?;

    let created = repositories::materials::create(
        state.db(),
        repositories::materials::CreateMaterial {
            class_id,
            title: &title,
            description: description.as_deref().filter(|text| !text.trim().is_empty()),
            file_key: &key,
            original_filename: &raw_name,
            file_type: &extension,
            file_size,
            uploaded_by: teacher.id,
            uploaded_at: primitive_now_utc(),
        },
    )
    .await;

    let material = match created {
        Ok(material) => material,
        Err(e) => {
            if let Err(cleanup_err) = storage.delete_object(&key).await {
                tracing::warn!(error = %cleanup_err, key, "Failed to remove orphaned material file");
            }
            return Err(ApiError::internal(e, "Failed to store material metadata"));
        }
    };

    Ok((StatusCode::CREATED, Json(MaterialResponse::from_db(material))))
}

async fn download_url(
    Path(material_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<DownloadUrlResponse>, ApiError> {
    let material = fetch_owned_material(&state, &teacher, material_id).await?;

    let storage = state.storage().ok_or_else(|| {
        ApiError::ServiceUnavailable("File storage is not configured".to_string())
    })?;

    let expires_in_seconds = state.settings().storage().presigned_url_expire_minutes * 60;
    let url = storage
        .presign_get(&material.file_key, std::time::Duration::from_secs(expires_in_seconds))
        .await
        .map_err(|e| ApiError::internal(e, "Failed to generate download URL"))?;

    let download_count =
        repositories::materials::increment_download_count(state.db(), material.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update download count"))?;

    Ok(Json(DownloadUrlResponse { download_url: url, expires_in_seconds, download_count }))
}

async fn delete_material(
    Path(material_id): Path<i64>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let material = fetch_owned_material(&state, &teacher, material_id).await?;

    // Storage goes first; a missing object or a storage hiccup is logged and
    // the record delete still proceeds.
    if let Some(storage) = state.storage() {
        if let Err(err) = storage.delete_object(&material.file_key).await {
            tracing::warn!(error = %err, key = %material.file_key, "Failed to delete material file");
        }
    }

    repositories::materials::delete(state.db(), material.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete material"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Resolves the chain Material -> Class before the ownership rule fires.
async fn fetch_owned_material(
    state: &AppState,
    teacher: &User,
    material_id: i64,
) -> Result<CourseMaterial, ApiError> {
    let material = repositories::materials::find_by_id(state.db(), material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load material"))?
        .ok_or_else(|| ApiError::NotFound("Material not found".to_string()))?;

    require_class_ownership(state, teacher, material.class_id).await?;

    Ok(material)
}

#[cfg(test)]
mod tests;
