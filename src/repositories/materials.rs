use sqlx::PgPool;

use crate::db::models::CourseMaterial;

const COLUMNS: &str = "\
    id, class_id, title, description, file_key, original_filename, file_type, \
    file_size, uploaded_by, uploaded_at, is_public, display_order, download_count";

pub(crate) struct CreateMaterial<'a> {
    pub(crate) class_id: i64,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) file_key: &'a str,
    pub(crate) original_filename: &'a str,
    pub(crate) file_type: &'a str,
    pub(crate) file_size: i64,
    pub(crate) uploaded_by: i64,
    pub(crate) uploaded_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateMaterial<'_>,
) -> Result<CourseMaterial, sqlx::Error> {
    sqlx::query_as::<_, CourseMaterial>(&format!(
        "INSERT INTO course_materials (
            class_id, title, description, file_key, original_filename, file_type,
            file_size, uploaded_by, uploaded_at, is_public, display_order, download_count
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,TRUE,0,0)
         RETURNING {COLUMNS}",
    ))
    .bind(params.class_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.file_key)
    .bind(params.original_filename)
    .bind(params.file_type)
    .bind(params.file_size)
    .bind(params.uploaded_by)
    .bind(params.uploaded_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    material_id: i64,
) -> Result<Option<CourseMaterial>, sqlx::Error> {
    sqlx::query_as::<_, CourseMaterial>(&format!(
        "SELECT {COLUMNS} FROM course_materials WHERE id = $1"
    ))
    .bind(material_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_class(
    pool: &PgPool,
    class_id: i64,
) -> Result<Vec<CourseMaterial>, sqlx::Error> {
    sqlx::query_as::<_, CourseMaterial>(&format!(
        "SELECT {COLUMNS} FROM course_materials WHERE class_id = $1 ORDER BY display_order, id"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn increment_download_count(
    pool: &PgPool,
    material_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "UPDATE course_materials SET download_count = download_count + 1
         WHERE id = $1
         RETURNING download_count",
    )
    .bind(material_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, material_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM course_materials WHERE id = $1")
        .bind(material_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
