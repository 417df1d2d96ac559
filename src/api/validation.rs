use std::path::Path;

use crate::api::errors::ApiError;

pub(crate) const MAX_ASSIGNMENT_SCORE: f64 = 1000.0;
pub(crate) const MAX_CLASS_GRADE: f64 = 10.0;

pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::BadRequest(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

pub(crate) fn validate_max_score(max_score: f64) -> Result<(), ApiError> {
    if max_score.is_finite() && (0.0..=MAX_ASSIGNMENT_SCORE).contains(&max_score) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "max_score must be between 0 and {MAX_ASSIGNMENT_SCORE}"
        )))
    }
}

/// Inclusive on both ends: a score of exactly 0 or exactly max_score is valid.
pub(crate) fn validate_submission_score(score: f64, max_score: f64) -> Result<(), ApiError> {
    if score.is_finite() && (0.0..=max_score).contains(&score) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("score must be between 0 and {max_score}")))
    }
}

pub(crate) fn validate_class_grade(grade: f64) -> Result<(), ApiError> {
    if grade.is_finite() && (0.0..=MAX_CLASS_GRADE).contains(&grade) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("grade must be between 0 and {MAX_CLASS_GRADE}")))
    }
}

pub(crate) fn validate_material_upload(
    filename: &str,
    allowed_extensions: &[String],
) -> Result<String, ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if allowed_extensions.iter().any(|allowed| allowed == &extension) {
        Ok(extension)
    } else {
        Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")))
    }
}

/// Strips path separators and shell-hostile characters from an uploaded
/// filename before it becomes part of an object key.
pub(crate) fn sanitized_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
