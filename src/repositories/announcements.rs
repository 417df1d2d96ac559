use sqlx::PgPool;

use crate::db::models::Announcement;

const COLUMNS: &str = "\
    id, class_id, title, content, created_by, created_at, is_important, \
    expiry_date, view_count, is_active";

pub(crate) struct CreateAnnouncement<'a> {
    pub(crate) class_id: i64,
    pub(crate) title: &'a str,
    pub(crate) content: &'a str,
    pub(crate) created_by: i64,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) is_important: bool,
    pub(crate) expiry_date: Option<time::PrimitiveDateTime>,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAnnouncement<'_>,
) -> Result<Announcement, sqlx::Error> {
    sqlx::query_as::<_, Announcement>(&format!(
        "INSERT INTO announcements (
            class_id, title, content, created_by, created_at, is_important,
            expiry_date, view_count, is_active
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,0,TRUE)
         RETURNING {COLUMNS}",
    ))
    .bind(params.class_id)
    .bind(params.title)
    .bind(params.content)
    .bind(params.created_by)
    .bind(params.created_at)
    .bind(params.is_important)
    .bind(params.expiry_date)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    announcement_id: i64,
) -> Result<Option<Announcement>, sqlx::Error> {
    sqlx::query_as::<_, Announcement>(&format!(
        "SELECT {COLUMNS} FROM announcements WHERE id = $1"
    ))
    .bind(announcement_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_active_by_class(
    pool: &PgPool,
    class_id: i64,
) -> Result<Vec<Announcement>, sqlx::Error> {
    sqlx::query_as::<_, Announcement>(&format!(
        "SELECT {COLUMNS} FROM announcements
         WHERE class_id = $1 AND is_active
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, announcement_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
        .bind(announcement_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
