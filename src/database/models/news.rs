use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Department;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub event_date: Option<NaiveDate>,
    pub is_event: bool,
    pub department: Department,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsInput {
    pub title: String,
    pub content: String,
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_event: bool,
    pub department: Department,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQuery {
    pub department: Option<Department>,
}
