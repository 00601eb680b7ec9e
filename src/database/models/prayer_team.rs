use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTeam {
    pub id: Uuid,
    pub member1_id: Uuid,
    pub member2_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl PrayerTeam {
    pub fn includes(&self, user_id: Uuid) -> bool {
        self.member1_id == user_id || self.member2_id == user_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTeamDetail {
    pub id: Uuid,
    pub member1_id: Uuid,
    pub member1_name: String,
    pub member2_id: Uuid,
    pub member2_name: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrayerTeam {
    pub member1_id: Uuid,
    pub member2_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerTeamInput {
    pub member1_id: Uuid,
    pub member2_id: Uuid,
    /// Defaults to the current week when omitted
    pub week_start: Option<NaiveDate>,
    pub week_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTeamsInput {
    #[serde(default)]
    pub replace_existing: bool,
    pub week_start: Option<NaiveDate>,
    pub week_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationAction {
    Created,
    Replaced,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTeamsResponse {
    pub count: usize,
    pub action: GenerationAction,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub teams: Vec<PrayerTeam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    pub week_start: Option<NaiveDate>,
    pub week_end: Option<NaiveDate>,
}
