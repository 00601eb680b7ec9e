use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{Department, PrayerSubject, PrayerSubjectInput},
    utils::sql,
};

pub async fn create_subject(input: &PrayerSubjectInput) -> Result<PrayerSubject, sqlx::Error> {
    let subject = sqlx::query_as::<_, PrayerSubject>(&sql(r#"
        INSERT INTO
            prayer_subjects (
                id,
                title,
                description,
                department,
                is_active,
                created_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            title,
            description,
            department,
            is_active,
            created_at
    "#))
    .bind(Uuid::new_v4())
    .bind(input.title.trim())
    .bind(&input.description)
    .bind(input.department)
    .bind(input.is_active.unwrap_or(true))
    .bind(Utc::now())
    .fetch_one(get_pool()?)
    .await?;

    Ok(subject)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<PrayerSubject>, sqlx::Error> {
    let subject = sqlx::query_as::<_, PrayerSubject>(&sql(r#"
        SELECT
            id,
            title,
            description,
            department,
            is_active,
            created_at
        FROM
            prayer_subjects
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(subject)
}

pub async fn list_subjects(
    department: Option<Department>,
    include_inactive: bool,
) -> Result<Vec<PrayerSubject>, sqlx::Error> {
    let subjects = sqlx::query_as::<_, PrayerSubject>(&sql(r#"
        SELECT
            id,
            title,
            description,
            department,
            is_active,
            created_at
        FROM
            prayer_subjects
        WHERE
            (?::VARCHAR IS NULL OR department = ?)
            AND (? OR is_active)
        ORDER BY
            created_at DESC
    "#))
    .bind(department)
    .bind(department)
    .bind(include_inactive)
    .fetch_all(get_pool()?)
    .await?;

    Ok(subjects)
}

pub async fn update_subject(
    id: Uuid,
    input: &PrayerSubjectInput,
) -> Result<Option<PrayerSubject>, sqlx::Error> {
    let subject = sqlx::query_as::<_, PrayerSubject>(&sql(r#"
        UPDATE prayer_subjects
        SET
            title = ?,
            description = ?,
            department = ?,
            is_active = COALESCE(?, is_active)
        WHERE
            id = ?
        RETURNING
            id,
            title,
            description,
            department,
            is_active,
            created_at
    "#))
    .bind(input.title.trim())
    .bind(&input.description)
    .bind(input.department)
    .bind(input.is_active)
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(subject)
}

pub async fn delete_subject(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM prayer_subjects WHERE id = ?"))
        .bind(id)
        .execute(get_pool()?)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
