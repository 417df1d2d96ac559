use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{AssignmentType, EnrollmentStatus, SubmissionStatus, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Class {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) code: String,
    pub(crate) description: Option<String>,
    pub(crate) teacher_id: i64,
    pub(crate) semester: String,
    pub(crate) academic_year: String,
    pub(crate) max_students: Option<i32>,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Enrollment {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) student_id: i64,
    pub(crate) enrolled_at: PrimitiveDateTime,
    pub(crate) status: EnrollmentStatus,
    pub(crate) grade: Option<f64>,
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assignment {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) instructions: Option<String>,
    pub(crate) due_date: PrimitiveDateTime,
    pub(crate) max_score: f64,
    pub(crate) assignment_type: AssignmentType,
    pub(crate) is_published: bool,
    pub(crate) allow_late_submission: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: i64,
    pub(crate) assignment_id: i64,
    pub(crate) student_id: i64,
    pub(crate) content: Option<String>,
    pub(crate) file_key: Option<String>,
    pub(crate) original_filename: Option<String>,
    pub(crate) file_size: Option<i64>,
    pub(crate) submitted_at: PrimitiveDateTime,
    pub(crate) score: Option<f64>,
    pub(crate) feedback: Option<String>,
    pub(crate) status: SubmissionStatus,
    pub(crate) is_late: bool,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct CourseMaterial {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) file_key: String,
    pub(crate) original_filename: String,
    pub(crate) file_type: String,
    pub(crate) file_size: i64,
    pub(crate) uploaded_by: i64,
    pub(crate) uploaded_at: PrimitiveDateTime,
    pub(crate) is_public: bool,
    pub(crate) display_order: i32,
    pub(crate) download_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Announcement {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) created_by: i64,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) is_important: bool,
    pub(crate) expiry_date: Option<PrimitiveDateTime>,
    pub(crate) view_count: i64,
    pub(crate) is_active: bool,
}
