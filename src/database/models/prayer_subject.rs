use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Department;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PrayerSubject {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub department: Department,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerSubjectInput {
    pub title: String,
    pub description: Option<String>,
    pub department: Department,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerSubjectQuery {
    pub department: Option<Department>,
    #[serde(default)]
    pub include_inactive: bool,
}
