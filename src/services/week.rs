use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// An inclusive calendar-date span; by default Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    /// An explicit range; `end` must not precede `start`.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::BadRequest(format!(
                "Week end {} is before week start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Resolves optional request bounds: both given is a custom range, one given
    /// selects the week containing it, neither selects the week of `today`.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::custom(start, end),
            (Some(date), None) | (None, Some(date)) => Ok(week_range(date)),
            (None, None) => Ok(week_range(today)),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && start <= self.end
    }
}

/// The Monday-to-Sunday week containing `date`.
pub fn week_range(date: NaiveDate) -> WeekRange {
    let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    WeekRange {
        start,
        end: start + Duration::days(6),
    }
}

/// First date on or after `from` that falls on `weekday`.
pub fn next_weekday(from: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (7 + weekday.num_days_from_monday() - from.weekday().num_days_from_monday()) % 7;
    from + Duration::days(i64::from(ahead))
}

/// The server's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
