use sqlx::{FromRow, PgPool};

use crate::db::models::Submission;
use crate::db::types::SubmissionStatus;

const COLUMNS: &str = "\
    id, assignment_id, student_id, content, file_key, original_filename, \
    file_size, submitted_at, score, feedback, status, is_late, graded_at";

pub(crate) struct CreateSubmission<'a> {
    pub(crate) assignment_id: i64,
    pub(crate) student_id: i64,
    pub(crate) content: Option<&'a str>,
    pub(crate) file_key: Option<&'a str>,
    pub(crate) original_filename: Option<&'a str>,
    pub(crate) file_size: Option<i64>,
    pub(crate) submitted_at: time::PrimitiveDateTime,
    pub(crate) is_late: bool,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            assignment_id, student_id, content, file_key, original_filename,
            file_size, submitted_at, status, is_late
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,'submitted',$8)
         RETURNING {COLUMNS}",
    ))
    .bind(params.assignment_id)
    .bind(params.student_id)
    .bind(params.content)
    .bind(params.file_key)
    .bind(params.original_filename)
    .bind(params.file_size)
    .bind(params.submitted_at)
    .bind(params.is_late)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    submission_id: i64,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(submission_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn count_by_assignment(
    pool: &PgPool,
    assignment_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions WHERE assignment_id = $1")
        .bind(assignment_id)
        .fetch_one(pool)
        .await
}

/// Applies a grade in a single statement so a failed validation never leaves
/// a half-updated row behind.
pub(crate) async fn grade(
    pool: &PgPool,
    submission_id: i64,
    score: f64,
    feedback: Option<&str>,
    graded_at: time::PrimitiveDateTime,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions
         SET score = $1, feedback = $2, status = 'graded', graded_at = $3
         WHERE id = $4
         RETURNING {COLUMNS}",
    ))
    .bind(score)
    .bind(feedback)
    .bind(graded_at)
    .bind(submission_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn set_status(
    pool: &PgPool,
    submission_id: i64,
    status: SubmissionStatus,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions SET status = $1 WHERE id = $2 RETURNING {COLUMNS}",
    ))
    .bind(status)
    .bind(submission_id)
    .fetch_one(pool)
    .await
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct GradingBoardRow {
    pub(crate) student_id: i64,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) submission_id: Option<i64>,
    pub(crate) submitted_at: Option<time::PrimitiveDateTime>,
    pub(crate) score: Option<f64>,
    pub(crate) status: Option<SubmissionStatus>,
    pub(crate) is_late: Option<bool>,
}

/// Every approved student in the assignment's class paired with their
/// submission, submitted or not.
pub(crate) async fn grading_board(
    pool: &PgPool,
    assignment_id: i64,
    class_id: i64,
) -> Result<Vec<GradingBoardRow>, sqlx::Error> {
    sqlx::query_as::<_, GradingBoardRow>(
        "SELECT u.id AS student_id, u.full_name, u.email,
                s.id AS submission_id, s.submitted_at, s.score, s.status, s.is_late
         FROM enrollments e
         JOIN users u ON u.id = e.student_id
         LEFT JOIN submissions s
             ON s.assignment_id = $1 AND s.student_id = e.student_id
         WHERE e.class_id = $2 AND e.status = 'approved'
         ORDER BY u.full_name, u.id",
    )
    .bind(assignment_id)
    .bind(class_id)
    .fetch_all(pool)
    .await
}
