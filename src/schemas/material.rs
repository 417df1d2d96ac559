use serde::Serialize;

use crate::core::time::format_primitive;

#[derive(Debug, Serialize)]
pub(crate) struct MaterialResponse {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) original_filename: String,
    pub(crate) file_type: String,
    pub(crate) file_size: i64,
    pub(crate) uploaded_by: i64,
    pub(crate) uploaded_at: String,
    pub(crate) is_public: bool,
    pub(crate) display_order: i32,
    pub(crate) download_count: i64,
}

impl MaterialResponse {
    pub(crate) fn from_db(material: crate::db::models::CourseMaterial) -> Self {
        Self {
            id: material.id,
            class_id: material.class_id,
            title: material.title,
            description: material.description,
            original_filename: material.original_filename,
            file_type: material.file_type,
            file_size: material.file_size,
            uploaded_by: material.uploaded_by,
            uploaded_at: format_primitive(material.uploaded_at),
            is_public: material.is_public,
            display_order: material.display_order,
            download_count: material.download_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DownloadUrlResponse {
    pub(crate) download_url: String,
    pub(crate) expires_in_seconds: u64,
    pub(crate) download_count: i64,
}
