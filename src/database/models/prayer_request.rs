use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequest {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_anonymous: bool,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Public view of a request; the submitter is hidden for anonymous entries.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequestView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub is_anonymous: bool,
    pub user_id: Option<Uuid>,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PrayerRequestView {
    pub fn redacted(mut self) -> Self {
        if self.is_anonymous {
            self.user_id = None;
            self.user_name = None;
        }
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequestInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_anonymous: bool,
}
