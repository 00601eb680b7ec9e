use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    /// The two fixed weekly prayer sessions a moderator can lead.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum SlotType {
        Monday => "MONDAY",
        Saturday => "SATURDAY",
    }
}

impl SlotType {
    pub fn weekday(&self) -> Weekday {
        match self {
            SlotType::Monday => Weekday::Mon,
            SlotType::Saturday => Weekday::Sat,
        }
    }

    /// Default `(start, end)` wall-clock window for the slot.
    pub fn default_times(&self) -> (&'static str, &'static str) {
        match self {
            SlotType::Monday => ("18:00", "19:00"),
            SlotType::Saturday => ("16:30", "18:00"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorSchedule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub schedule_date: NaiveDate,
    pub slot_type: SlotType,
    pub start_time: String, // HH:MM
    pub end_time: String,   // HH:MM
    pub is_auto_generated: bool,
    pub created_at: DateTime<Utc>,
}

/// Schedule row joined with the moderator's name for listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorScheduleDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub schedule_date: NaiveDate,
    pub slot_type: SlotType,
    pub start_time: String,
    pub end_time: String,
    pub is_auto_generated: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewModeratorSchedule {
    pub user_id: Uuid,
    pub schedule_date: NaiveDate,
    pub slot_type: SlotType,
    pub start_time: String,
    pub end_time: String,
    pub is_auto_generated: bool,
}

impl NewModeratorSchedule {
    /// A rotation-generated row using the slot's default window.
    pub fn auto(user_id: Uuid, schedule_date: NaiveDate, slot_type: SlotType) -> Self {
        let (start, end) = slot_type.default_times();
        Self {
            user_id,
            schedule_date,
            slot_type,
            start_time: start.to_string(),
            end_time: end.to_string(),
            is_auto_generated: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratorScheduleInput {
    pub user_id: Uuid,
    pub schedule_date: NaiveDate,
    pub slot_type: SlotType,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleInput {
    pub weeks_to_generate: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleResponse {
    pub count: usize,
    pub message: String,
    pub schedules: Vec<ModeratorSchedule>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub deleted_count: u64,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
