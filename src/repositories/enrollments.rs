use sqlx::{FromRow, PgPool};

use crate::db::models::Enrollment;
use crate::db::types::EnrollmentStatus;

const COLUMNS: &str = "id, class_id, student_id, enrolled_at, status, grade, notes";

pub(crate) struct CreateEnrollment {
    pub(crate) class_id: i64,
    pub(crate) student_id: i64,
    pub(crate) enrolled_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateEnrollment,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "INSERT INTO enrollments (class_id, student_id, enrolled_at, status)
         VALUES ($1,$2,$3,'pending')
         RETURNING {COLUMNS}",
    ))
    .bind(params.class_id)
    .bind(params.student_id)
    .bind(params.enrolled_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    enrollment_id: i64,
) -> Result<Option<Enrollment>, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1"))
        .bind(enrollment_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn set_status(
    pool: &PgPool,
    enrollment_id: i64,
    status: EnrollmentStatus,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "UPDATE enrollments SET status = $1 WHERE id = $2 RETURNING {COLUMNS}",
    ))
    .bind(status)
    .bind(enrollment_id)
    .fetch_one(pool)
    .await
}

/// Writes grade and notes together; a request without notes clears them.
pub(crate) async fn set_grade(
    pool: &PgPool,
    enrollment_id: i64,
    grade: f64,
    notes: Option<&str>,
) -> Result<Enrollment, sqlx::Error> {
    sqlx::query_as::<_, Enrollment>(&format!(
        "UPDATE enrollments SET grade = $1, notes = $2
         WHERE id = $3
         RETURNING {COLUMNS}",
    ))
    .bind(grade)
    .bind(notes)
    .bind(enrollment_id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_status_for_student(
    pool: &PgPool,
    class_id: i64,
    student_id: i64,
) -> Result<Option<EnrollmentStatus>, sqlx::Error> {
    sqlx::query_scalar::<_, EnrollmentStatus>(
        "SELECT status FROM enrollments WHERE class_id = $1 AND student_id = $2",
    )
    .bind(class_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct RosterRow {
    pub(crate) enrollment_id: i64,
    pub(crate) student_id: i64,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) grade: Option<f64>,
    pub(crate) enrolled_at: time::PrimitiveDateTime,
}

pub(crate) async fn roster(pool: &PgPool, class_id: i64) -> Result<Vec<RosterRow>, sqlx::Error> {
    sqlx::query_as::<_, RosterRow>(
        "SELECT e.id AS enrollment_id, u.id AS student_id, u.full_name, u.email,
                e.status, e.grade, e.enrolled_at
         FROM enrollments e
         JOIN users u ON u.id = e.student_id
         WHERE e.class_id = $1 AND u.role = 'student'
         ORDER BY u.full_name, u.id",
    )
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_approved_by_class(
    pool: &PgPool,
    class_id: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments WHERE class_id = $1 AND status = 'approved'",
    )
    .bind(class_id)
    .fetch_one(pool)
    .await
}
