use sqlx::PgPool;

use crate::db::models::Assignment;
use crate::db::types::AssignmentType;

const COLUMNS: &str = "\
    id, class_id, title, description, instructions, due_date, max_score, \
    assignment_type, is_published, allow_late_submission, created_at, updated_at";

pub(crate) struct CreateAssignment<'a> {
    pub(crate) class_id: i64,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) instructions: Option<&'a str>,
    pub(crate) due_date: time::PrimitiveDateTime,
    pub(crate) max_score: f64,
    pub(crate) assignment_type: AssignmentType,
    pub(crate) is_published: bool,
    pub(crate) allow_late_submission: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) struct UpdateAssignment {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) instructions: Option<String>,
    pub(crate) due_date: Option<time::PrimitiveDateTime>,
    pub(crate) max_score: Option<f64>,
    pub(crate) assignment_type: Option<AssignmentType>,
    pub(crate) is_published: Option<bool>,
    pub(crate) allow_late_submission: Option<bool>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (
            class_id, title, description, instructions, due_date, max_score,
            assignment_type, is_published, allow_late_submission, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
         RETURNING {COLUMNS}",
    ))
    .bind(params.class_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.instructions)
    .bind(params.due_date)
    .bind(params.max_score)
    .bind(params.assignment_type)
    .bind(params.is_published)
    .bind(params.allow_late_submission)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    assignment_id: i64,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments WHERE id = $1"))
        .bind(assignment_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_by_class(
    pool: &PgPool,
    class_id: i64,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {COLUMNS} FROM assignments WHERE class_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    assignment_id: i64,
    params: UpdateAssignment,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "UPDATE assignments SET
            title = COALESCE($1, title),
            description = COALESCE($2, description),
            instructions = COALESCE($3, instructions),
            due_date = COALESCE($4, due_date),
            max_score = COALESCE($5, max_score),
            assignment_type = COALESCE($6, assignment_type),
            is_published = COALESCE($7, is_published),
            allow_late_submission = COALESCE($8, allow_late_submission),
            updated_at = $9
         WHERE id = $10
         RETURNING {COLUMNS}",
    ))
    .bind(params.title)
    .bind(params.description)
    .bind(params.instructions)
    .bind(params.due_date)
    .bind(params.max_score)
    .bind(params.assignment_type)
    .bind(params.is_published)
    .bind(params.allow_late_submission)
    .bind(params.updated_at)
    .bind(assignment_id)
    .fetch_one(pool)
    .await
}

/// Deletes the assignment only while it has no submissions. The guard lives
/// in the statement itself so a submission landing after the caller's checks
/// cannot be cascade-deleted. Returns false when a submission blocked it.
pub(crate) async fn delete_if_no_submissions(
    pool: &PgPool,
    assignment_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM assignments
         WHERE id = $1
           AND NOT EXISTS (SELECT 1 FROM submissions WHERE assignment_id = $1)",
    )
    .bind(assignment_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
