use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::database::{
    models::{
        GenerateScheduleResponse, ModeratorSchedule, ModeratorScheduleInput,
        NewModeratorSchedule, SlotType,
    },
    repositories::{moderator_schedule as schedule_repo, user as user_repo},
    transaction::{DatabaseTransaction, LockScope, lock},
};
use crate::error::AppError;
use crate::services::week;

pub const DEFAULT_WEEKS: u32 = 4;
pub const MAX_WEEKS: u32 = 52;

const SLOT_ORDER: [SlotType; 2] = [SlotType::Monday, SlotType::Saturday];

pub fn validate_weeks(weeks: Option<u32>) -> Result<u32, AppError> {
    match weeks.unwrap_or(DEFAULT_WEEKS) {
        weeks @ 1..=MAX_WEEKS => Ok(weeks),
        other => Err(AppError::BadRequest(format!(
            "weeksToGenerate must be between 1 and {}, got {}",
            MAX_WEEKS, other
        ))),
    }
}

/// Every `(date, slot)` the rotation covers, in assignment order. Within a week
/// the order is by slot (Monday then Saturday), not by date: from Tuesday to
/// Friday the week's Saturday falls before its Monday.
pub fn rotation_slots(weeks: u32, today: NaiveDate) -> Vec<(NaiveDate, SlotType)> {
    (0..weeks)
        .flat_map(|offset| {
            SLOT_ORDER.into_iter().map(move |slot| {
                let first = week::next_weekday(today, slot.weekday());
                (first + Duration::weeks(i64::from(offset)), slot)
            })
        })
        .collect()
}

/// Plans round-robin assignments. The cursor into `users` is shared across
/// both slot types and all weeks, and only moves when a row is planned, so an
/// occupied slot does not cost anyone their turn.
pub fn plan_rotation(
    users: &[Uuid],
    weeks: u32,
    today: NaiveDate,
    is_occupied: impl Fn(NaiveDate, SlotType) -> bool,
) -> Result<Vec<NewModeratorSchedule>, AppError> {
    if users.is_empty() {
        return Err(AppError::NoUsersAvailable);
    }

    let (_, planned) = rotation_slots(weeks, today)
        .into_iter()
        .filter(|(date, slot)| !is_occupied(*date, *slot))
        .fold((0usize, Vec::new()), |(cursor, mut planned), (date, slot)| {
            planned.push(NewModeratorSchedule::auto(
                users[cursor % users.len()],
                date,
                slot,
            ));
            (cursor + 1, planned)
        });

    Ok(planned)
}

fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| AppError::BadRequest(format!("Invalid time '{}', expected HH:MM", value)))
}

/// Fills in the slot's default window and checks `start < end`.
pub fn resolve_times(
    slot: SlotType,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(String, String), AppError> {
    let (default_start, default_end) = slot.default_times();
    let start = parse_time(start.unwrap_or(default_start))?;
    let end = parse_time(end.unwrap_or(default_end))?;

    if start >= end {
        return Err(AppError::BadRequest(format!(
            "Start time {} must be before end time {}",
            start.format("%H:%M"),
            end.format("%H:%M")
        )));
    }

    Ok((
        start.format("%H:%M").to_string(),
        end.format("%H:%M").to_string(),
    ))
}

pub async fn generate_schedule(weeks: Option<u32>) -> Result<GenerateScheduleResponse, AppError> {
    let weeks = validate_weeks(weeks)?;
    let today = week::today();

    let users: Vec<Uuid> = user_repo::get_all_users()
        .await?
        .into_iter()
        .map(|user| user.id)
        .collect();

    let dates: Vec<NaiveDate> = rotation_slots(weeks, today)
        .into_iter()
        .map(|(date, _)| date)
        .collect();
    let from = dates.iter().min().copied().unwrap_or(today);
    let to = dates.iter().max().copied().unwrap_or(today);

    let schedules = DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            lock(tx, LockScope::ModeratorSchedules).await?;

            let occupied: HashSet<(NaiveDate, SlotType)> =
                schedule_repo::find_occupied_slots(tx, from, to)
                    .await?
                    .into_iter()
                    .collect();

            let planned = plan_rotation(&users, weeks, today, |date, slot| {
                occupied.contains(&(date, slot))
            })?;

            Ok(schedule_repo::insert_schedules(tx, &planned).await?)
        })
    })
    .await?;

    log::info!(
        "Generated {} moderator schedules over {} weeks",
        schedules.len(),
        weeks
    );

    Ok(GenerateScheduleResponse {
        count: schedules.len(),
        message: format!("{} schedules created", schedules.len()),
        schedules,
    })
}

/// Creates a manual schedule, or edits `existing_id` when given.
pub async fn save_schedule(
    input: ModeratorScheduleInput,
    existing_id: Option<Uuid>,
) -> Result<ModeratorSchedule, AppError> {
    let (start_time, end_time) = resolve_times(
        input.slot_type,
        input.start_time.as_deref(),
        input.end_time.as_deref(),
    )?;

    if user_repo::find_by_id(input.user_id).await?.is_none() {
        return Err(AppError::UserNotFound(input.user_id));
    }

    let row = NewModeratorSchedule {
        user_id: input.user_id,
        schedule_date: input.schedule_date,
        slot_type: input.slot_type,
        start_time,
        end_time,
        is_auto_generated: false,
    };

    DatabaseTransaction::run(|tx| {
        Box::pin(async move {
            lock(tx, LockScope::ModeratorSchedules).await?;

            if schedule_repo::find_by_slot(tx, row.schedule_date, row.slot_type, existing_id)
                .await?
                .is_some()
            {
                log::warn!(
                    "Rejected moderator schedule for occupied slot {} {}",
                    row.schedule_date,
                    row.slot_type
                );
                return Err(AppError::ScheduleConflict(format!(
                    "{} {}",
                    row.schedule_date, row.slot_type
                )));
            }

            match existing_id {
                Some(id) => schedule_repo::update_schedule(tx, id, &row)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Moderator schedule not found".to_string())),
                None => schedule_repo::insert_schedules(tx, std::slice::from_ref(&row))
                    .await?
                    .pop()
                    .ok_or_else(|| {
                        AppError::internal_server_error_message(
                            "moderator schedule insert returned no row",
                        )
                    }),
            }
        })
    })
    .await
}
