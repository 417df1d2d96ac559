use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;

#[derive(Debug, Deserialize)]
pub(crate) struct ClassCreate {
    pub(crate) name: String,
    pub(crate) code: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    pub(crate) semester: String,
    #[serde(alias = "academicYear")]
    pub(crate) academic_year: String,
    #[serde(default)]
    #[serde(alias = "maxStudents")]
    pub(crate) max_students: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) code: Option<String>,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(default)]
    pub(crate) semester: Option<String>,
    #[serde(default)]
    #[serde(alias = "academicYear")]
    pub(crate) academic_year: Option<String>,
    #[serde(default)]
    #[serde(alias = "maxStudents")]
    pub(crate) max_students: Option<i32>,
    #[serde(default)]
    #[serde(alias = "isActive")]
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) code: String,
    pub(crate) description: Option<String>,
    pub(crate) teacher_id: i64,
    pub(crate) semester: String,
    pub(crate) academic_year: String,
    pub(crate) max_students: Option<i32>,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ClassResponse {
    pub(crate) fn from_db(class: crate::db::models::Class) -> Self {
        Self {
            id: class.id,
            name: class.name,
            code: class.code,
            description: class.description,
            teacher_id: class.teacher_id,
            semester: class.semester,
            academic_year: class.academic_year,
            max_students: class.max_students,
            is_active: class.is_active,
            created_at: format_primitive(class.created_at),
            updated_at: format_primitive(class.updated_at),
        }
    }
}
