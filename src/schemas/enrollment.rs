use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::types::EnrollmentStatus;
use crate::repositories::enrollments::RosterRow;

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentCreate {
    #[serde(alias = "studentId")]
    pub(crate) student_id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentStatusUpdate {
    pub(crate) status: EnrollmentStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnrollmentGradeUpdate {
    pub(crate) grade: f64,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) student_id: i64,
    pub(crate) enrolled_at: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) grade: Option<f64>,
    pub(crate) notes: Option<String>,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(enrollment: crate::db::models::Enrollment) -> Self {
        Self {
            id: enrollment.id,
            class_id: enrollment.class_id,
            student_id: enrollment.student_id,
            enrolled_at: format_primitive(enrollment.enrolled_at),
            status: enrollment.status,
            grade: enrollment.grade,
            notes: enrollment.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterEntryResponse {
    pub(crate) enrollment_id: i64,
    pub(crate) student_id: i64,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) status: EnrollmentStatus,
    pub(crate) grade: Option<f64>,
    pub(crate) enrolled_at: String,
}

impl RosterEntryResponse {
    pub(crate) fn from_row(row: RosterRow) -> Self {
        Self {
            enrollment_id: row.enrollment_id,
            student_id: row.student_id,
            full_name: row.full_name,
            email: row.email,
            status: row.status,
            grade: row.grade,
            enrolled_at: format_primitive(row.enrolled_at),
        }
    }
}
