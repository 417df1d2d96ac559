use sqlx::PgPool;

use crate::db::models::Class;

const COLUMNS: &str = "\
    id, name, code, description, teacher_id, semester, academic_year, \
    max_students, is_active, created_at, updated_at";

pub(crate) struct CreateClass<'a> {
    pub(crate) name: &'a str,
    pub(crate) code: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) teacher_id: i64,
    pub(crate) semester: &'a str,
    pub(crate) academic_year: &'a str,
    pub(crate) max_students: Option<i32>,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateClass {
    pub(crate) name: Option<String>,
    pub(crate) code: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) academic_year: Option<String>,
    pub(crate) max_students: Option<i32>,
    pub(crate) is_active: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateClass<'_>) -> Result<Class, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "INSERT INTO classes (
            name, code, description, teacher_id, semester, academic_year,
            max_students, is_active, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,TRUE,$8,$9)
         RETURNING {COLUMNS}",
    ))
    .bind(params.name)
    .bind(params.code)
    .bind(params.description)
    .bind(params.teacher_id)
    .bind(params.semester)
    .bind(params.academic_year)
    .bind(params.max_students)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, class_id: i64) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {COLUMNS} FROM classes WHERE id = $1"))
        .bind(class_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_teacher(
    pool: &PgPool,
    teacher_id: i64,
) -> Result<Vec<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "SELECT {COLUMNS} FROM classes WHERE teacher_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    class_id: i64,
    params: UpdateClass,
) -> Result<Class, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "UPDATE classes SET
            name = COALESCE($1, name),
            code = COALESCE($2, code),
            description = COALESCE($3, description),
            semester = COALESCE($4, semester),
            academic_year = COALESCE($5, academic_year),
            max_students = COALESCE($6, max_students),
            is_active = COALESCE($7, is_active),
            updated_at = $8
         WHERE id = $9
         RETURNING {COLUMNS}",
    ))
    .bind(params.name)
    .bind(params.code)
    .bind(params.description)
    .bind(params.semester)
    .bind(params.academic_year)
    .bind(params.max_students)
    .bind(params.is_active)
    .bind(params.updated_at)
    .bind(class_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, class_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classes WHERE id = $1")
        .bind(class_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
