use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;

#[derive(Debug, Deserialize)]
pub(crate) struct AnnouncementCreate {
    pub(crate) title: String,
    pub(crate) content: String,
    #[serde(default)]
    #[serde(alias = "isImportant")]
    pub(crate) is_important: bool,
    #[serde(default)]
    #[serde(alias = "expiryDate")]
    pub(crate) expiry_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnnouncementResponse {
    pub(crate) id: i64,
    pub(crate) class_id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) created_by: i64,
    pub(crate) created_at: String,
    pub(crate) is_important: bool,
    pub(crate) expiry_date: Option<String>,
    pub(crate) view_count: i64,
    pub(crate) is_active: bool,
}

impl AnnouncementResponse {
    pub(crate) fn from_db(announcement: crate::db::models::Announcement) -> Self {
        Self {
            id: announcement.id,
            class_id: announcement.class_id,
            title: announcement.title,
            content: announcement.content,
            created_by: announcement.created_by,
            created_at: format_primitive(announcement.created_at),
            is_important: announcement.is_important,
            expiry_date: announcement.expiry_date.map(format_primitive),
            view_count: announcement.view_count,
            is_active: announcement.is_active,
        }
    }
}
