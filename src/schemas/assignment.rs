use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::types::AssignmentType;

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentCreate {
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) instructions: Option<String>,
    #[serde(alias = "dueDate")]
    pub(crate) due_date: String,
    #[serde(alias = "maxScore")]
    pub(crate) max_score: f64,
    #[serde(default = "default_assignment_type")]
    #[serde(alias = "assignmentType")]
    pub(crate) assignment_type: AssignmentType,
    #[serde(default = "default_true")]
    #[serde(alias = "isPublished")]
    pub(crate) is_published: bool,
    #[serde(default)]
    #[serde(alias = "allowLateSubmission")]
    pub(crate) allow_late_submission: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentUpdate {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) instructions: Option<String>,
    #[serde(default)]
    #[serde(alias = "dueDate")]
    pub(crate) due_date: Option<String>,
    #[serde(default)]
    #[serde(alias = "maxScore")]
    pub(crate) max_score: Option<f64>,
    #[serde(default)]
    #[serde(alias = "assignmentType")]
    pub(crate) assignment_type: Option<AssignmentType>,
    #[serde(default)]
    #[serde(alias = "isPublished")]
    pub(crate) is_published: Option<bool>,
    #[serde(default)]
    #[serde(alias = "allowLateSubmission")]
    pub(crate) allow_late_submission: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentResponse {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) instructions: Option<String>,
    pub(crate) due_date: String,
    pub(crate) max_score: f64,
    pub(crate) assignment_type: AssignmentType,
    pub(crate) is_published: bool,
    pub(crate) allow_late_submission: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: crate::db::models::Assignment) -> Self {
        Self {
            id: assignment.id,
            class_id: assignment.class_id,
            title: assignment.title,
            description: assignment.description,
            instructions: assignment.instructions,
            due_date: format_primitive(assignment.due_date),
            max_score: assignment.max_score,
            assignment_type: assignment.assignment_type,
            is_published: assignment.is_published,
            allow_late_submission: assignment.allow_late_submission,
            created_at: format_primitive(assignment.created_at),
            updated_at: format_primitive(assignment.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentDetailsResponse {
    #[serde(flatten)]
    pub(crate) assignment: AssignmentResponse,
    pub(crate) enrolled_count: i64,
    pub(crate) submitted_count: i64,
}

fn default_assignment_type() -> AssignmentType {
    AssignmentType::Homework
}

fn default_true() -> bool {
    true
}
