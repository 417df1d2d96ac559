use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::types::SubmissionStatus;
use crate::repositories::submissions::GradingBoardRow;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionGrade {
    pub(crate) score: f64,
    #[serde(default)]
    pub(crate) feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: i64,
    pub(crate) assignment_id: i64,
    pub(crate) student_id: i64,
    pub(crate) content: Option<String>,
    pub(crate) file_key: Option<String>,
    pub(crate) original_filename: Option<String>,
    pub(crate) file_size: Option<i64>,
    pub(crate) submitted_at: String,
    pub(crate) score: Option<f64>,
    pub(crate) feedback: Option<String>,
    pub(crate) status: SubmissionStatus,
    pub(crate) is_late: bool,
    pub(crate) graded_at: Option<String>,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: crate::db::models::Submission) -> Self {
        Self {
            id: submission.id,
            assignment_id: submission.assignment_id,
            student_id: submission.student_id,
            content: submission.content,
            file_key: submission.file_key,
            original_filename: submission.original_filename,
            file_size: submission.file_size,
            submitted_at: format_primitive(submission.submitted_at),
            score: submission.score,
            feedback: submission.feedback,
            status: submission.status,
            is_late: submission.is_late,
            graded_at: submission.graded_at.map(format_primitive),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GradingBoardEntry {
    pub(crate) student_id: i64,
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) submission_id: Option<i64>,
    pub(crate) submitted_at: Option<String>,
    pub(crate) score: Option<f64>,
    pub(crate) status: Option<SubmissionStatus>,
    pub(crate) is_late: Option<bool>,
}

impl GradingBoardEntry {
    pub(crate) fn from_row(row: GradingBoardRow) -> Self {
        Self {
            student_id: row.student_id,
            full_name: row.full_name,
            email: row.email,
            submission_id: row.submission_id,
            submitted_at: row.submitted_at.map(format_primitive),
            score: row.score,
            status: row.status,
            is_late: row.is_late,
        }
    }
}
