use chrono::{NaiveDate, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{ModeratorSchedule, ModeratorScheduleDetail, NewModeratorSchedule, SlotType},
    utils::sql,
};

pub async fn insert_schedules(
    tx: &mut Transaction<'_, Postgres>,
    rows: &[NewModeratorSchedule],
) -> Result<Vec<ModeratorSchedule>, sqlx::Error> {
    let mut created = Vec::with_capacity(rows.len());

    for row in rows {
        let schedule = sqlx::query_as::<_, ModeratorSchedule>(&sql(r#"
            INSERT INTO
                moderator_schedules (
                    id,
                    user_id,
                    schedule_date,
                    slot_type,
                    start_time,
                    end_time,
                    is_auto_generated,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                user_id,
                schedule_date,
                slot_type,
                start_time,
                end_time,
                is_auto_generated,
                created_at
        "#))
        .bind(Uuid::new_v4())
        .bind(row.user_id)
        .bind(row.schedule_date)
        .bind(row.slot_type)
        .bind(&row.start_time)
        .bind(&row.end_time)
        .bind(row.is_auto_generated)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        created.push(schedule);
    }

    Ok(created)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<ModeratorSchedule>, sqlx::Error> {
    let schedule = sqlx::query_as::<_, ModeratorSchedule>(&sql(r#"
        SELECT
            id,
            user_id,
            schedule_date,
            slot_type,
            start_time,
            end_time,
            is_auto_generated,
            created_at
        FROM
            moderator_schedules
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(schedule)
}

/// Another schedule occupying `(date, slot)`, ignoring `excluding` when updating.
pub async fn find_by_slot(
    tx: &mut Transaction<'_, Postgres>,
    schedule_date: NaiveDate,
    slot_type: SlotType,
    excluding: Option<Uuid>,
) -> Result<Option<ModeratorSchedule>, sqlx::Error> {
    let schedule = sqlx::query_as::<_, ModeratorSchedule>(&sql(r#"
        SELECT
            id,
            user_id,
            schedule_date,
            slot_type,
            start_time,
            end_time,
            is_auto_generated,
            created_at
        FROM
            moderator_schedules
        WHERE
            schedule_date = ?
            AND slot_type = ?
            AND (?::UUID IS NULL OR id <> ?)
        ORDER BY
            created_at ASC
        LIMIT 1
    "#))
    .bind(schedule_date)
    .bind(slot_type)
    .bind(excluding)
    .bind(excluding)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(schedule)
}

/// Every `(date, slot)` pair already taken between `from` and `to` inclusive.
pub async fn find_occupied_slots(
    tx: &mut Transaction<'_, Postgres>,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<(NaiveDate, SlotType)>, sqlx::Error> {
    let slots = sqlx::query_as::<_, (NaiveDate, SlotType)>(&sql(r#"
        SELECT DISTINCT
            schedule_date,
            slot_type
        FROM
            moderator_schedules
        WHERE
            schedule_date BETWEEN ? AND ?
    "#))
    .bind(from)
    .bind(to)
    .fetch_all(&mut **tx)
    .await?;

    Ok(slots)
}

pub async fn list_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<ModeratorScheduleDetail>, sqlx::Error> {
    let schedules = sqlx::query_as::<_, ModeratorScheduleDetail>(&sql(r#"
        SELECT
            ms.id,
            ms.user_id,
            u.name AS user_name,
            ms.schedule_date,
            ms.slot_type,
            ms.start_time,
            ms.end_time,
            ms.is_auto_generated,
            ms.created_at
        FROM
            moderator_schedules ms
            INNER JOIN users u ON u.id = ms.user_id
        WHERE
            (?::DATE IS NULL OR ms.schedule_date >= ?)
            AND (?::DATE IS NULL OR ms.schedule_date <= ?)
        ORDER BY
            ms.schedule_date ASC,
            ms.slot_type ASC
    "#))
    .bind(from)
    .bind(from)
    .bind(to)
    .bind(to)
    .fetch_all(get_pool()?)
    .await?;

    Ok(schedules)
}

/// All rows ordered by (date, slot type, creation time) for duplicate detection.
pub async fn list_ordered(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<ModeratorSchedule>, sqlx::Error> {
    let schedules = sqlx::query_as::<_, ModeratorSchedule>(&sql(r#"
        SELECT
            id,
            user_id,
            schedule_date,
            slot_type,
            start_time,
            end_time,
            is_auto_generated,
            created_at
        FROM
            moderator_schedules
        ORDER BY
            schedule_date ASC,
            slot_type ASC,
            created_at ASC
    "#))
    .fetch_all(&mut **tx)
    .await?;

    Ok(schedules)
}

pub async fn update_schedule(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    input: &NewModeratorSchedule,
) -> Result<Option<ModeratorSchedule>, sqlx::Error> {
    let schedule = sqlx::query_as::<_, ModeratorSchedule>(&sql(r#"
        UPDATE moderator_schedules
        SET
            user_id = ?,
            schedule_date = ?,
            slot_type = ?,
            start_time = ?,
            end_time = ?,
            is_auto_generated = ?
        WHERE
            id = ?
        RETURNING
            id,
            user_id,
            schedule_date,
            slot_type,
            start_time,
            end_time,
            is_auto_generated,
            created_at
    "#))
    .bind(input.user_id)
    .bind(input.schedule_date)
    .bind(input.slot_type)
    .bind(&input.start_time)
    .bind(&input.end_time)
    .bind(input.is_auto_generated)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(schedule)
}

pub async fn delete_schedule(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM moderator_schedules WHERE id = ?"))
        .bind(id)
        .execute(get_pool()?)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}

pub async fn delete_by_ids(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(&sql("DELETE FROM moderator_schedules WHERE id = ANY(?)"))
        .bind(ids)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}
