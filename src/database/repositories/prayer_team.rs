use chrono::{NaiveDate, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{NewPrayerTeam, PrayerTeam, PrayerTeamDetail},
    utils::sql,
};

pub async fn insert_teams(
    tx: &mut Transaction<'_, Postgres>,
    rows: &[NewPrayerTeam],
) -> Result<Vec<PrayerTeam>, sqlx::Error> {
    let mut created = Vec::with_capacity(rows.len());

    for row in rows {
        let team = sqlx::query_as::<_, PrayerTeam>(&sql(r#"
            INSERT INTO
                prayer_teams (
                    id,
                    member1_id,
                    member2_id,
                    week_start,
                    week_end,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                member1_id,
                member2_id,
                week_start,
                week_end,
                created_at
        "#))
        .bind(Uuid::new_v4())
        .bind(row.member1_id)
        .bind(row.member2_id)
        .bind(row.week_start)
        .bind(row.week_end)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        created.push(team);
    }

    Ok(created)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<PrayerTeam>, sqlx::Error> {
    let team = sqlx::query_as::<_, PrayerTeam>(&sql(r#"
        SELECT
            id,
            member1_id,
            member2_id,
            week_start,
            week_end,
            created_at
        FROM
            prayer_teams
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(team)
}

/// Teams whose week starts inside `[start, end]`.
pub async fn find_by_week(
    tx: &mut Transaction<'_, Postgres>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PrayerTeam>, sqlx::Error> {
    let teams = sqlx::query_as::<_, PrayerTeam>(&sql(r#"
        SELECT
            id,
            member1_id,
            member2_id,
            week_start,
            week_end,
            created_at
        FROM
            prayer_teams
        WHERE
            week_start BETWEEN ? AND ?
    "#))
    .bind(start)
    .bind(end)
    .fetch_all(&mut **tx)
    .await?;

    Ok(teams)
}

/// Teams containing either member whose range intersects `[start, end]`.
pub async fn find_overlapping_for_members(
    tx: &mut Transaction<'_, Postgres>,
    member1_id: Uuid,
    member2_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PrayerTeam>, sqlx::Error> {
    let teams = sqlx::query_as::<_, PrayerTeam>(&sql(r#"
        SELECT
            id,
            member1_id,
            member2_id,
            week_start,
            week_end,
            created_at
        FROM
            prayer_teams
        WHERE
            (
                member1_id IN (?, ?)
                OR member2_id IN (?, ?)
            )
            AND week_start <= ?
            AND week_end >= ?
    "#))
    .bind(member1_id)
    .bind(member2_id)
    .bind(member1_id)
    .bind(member2_id)
    .bind(end)
    .bind(start)
    .fetch_all(&mut **tx)
    .await?;

    Ok(teams)
}

pub async fn list_by_week(
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PrayerTeamDetail>, sqlx::Error> {
    let teams = sqlx::query_as::<_, PrayerTeamDetail>(&sql(r#"
        SELECT
            t.id,
            t.member1_id,
            m1.name AS member1_name,
            t.member2_id,
            m2.name AS member2_name,
            t.week_start,
            t.week_end,
            t.created_at
        FROM
            prayer_teams t
            INNER JOIN users m1 ON m1.id = t.member1_id
            INNER JOIN users m2 ON m2.id = t.member2_id
        WHERE
            t.week_start BETWEEN ? AND ?
        ORDER BY
            t.created_at ASC
    "#))
    .bind(start)
    .bind(end)
    .fetch_all(get_pool()?)
    .await?;

    Ok(teams)
}

/// Current and upcoming teams of one member.
pub async fn list_for_member(
    user_id: Uuid,
    from: NaiveDate,
) -> Result<Vec<PrayerTeamDetail>, sqlx::Error> {
    let teams = sqlx::query_as::<_, PrayerTeamDetail>(&sql(r#"
        SELECT
            t.id,
            t.member1_id,
            m1.name AS member1_name,
            t.member2_id,
            m2.name AS member2_name,
            t.week_start,
            t.week_end,
            t.created_at
        FROM
            prayer_teams t
            INNER JOIN users m1 ON m1.id = t.member1_id
            INNER JOIN users m2 ON m2.id = t.member2_id
        WHERE
            (t.member1_id = ? OR t.member2_id = ?)
            AND t.week_end >= ?
        ORDER BY
            t.week_start ASC
    "#))
    .bind(user_id)
    .bind(user_id)
    .bind(from)
    .fetch_all(get_pool()?)
    .await?;

    Ok(teams)
}

pub async fn update_team(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    input: &NewPrayerTeam,
) -> Result<Option<PrayerTeam>, sqlx::Error> {
    let team = sqlx::query_as::<_, PrayerTeam>(&sql(r#"
        UPDATE prayer_teams
        SET
            member1_id = ?,
            member2_id = ?,
            week_start = ?,
            week_end = ?
        WHERE
            id = ?
        RETURNING
            id,
            member1_id,
            member2_id,
            week_start,
            week_end,
            created_at
    "#))
    .bind(input.member1_id)
    .bind(input.member2_id)
    .bind(input.week_start)
    .bind(input.week_end)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(team)
}

pub async fn delete_team(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM prayer_teams WHERE id = ?"))
        .bind(id)
        .execute(get_pool()?)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}

/// Removes every team whose week starts inside `[start, end]`.
pub async fn delete_by_week(
    tx: &mut Transaction<'_, Postgres>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(&sql(
        "DELETE FROM prayer_teams WHERE week_start BETWEEN ? AND ?",
    ))
    .bind(start)
    .bind(end)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}
