use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{PrayerRequest, PrayerRequestInput, PrayerRequestView},
    utils::sql,
};

pub async fn create_request(
    input: &PrayerRequestInput,
    user_id: Option<Uuid>,
) -> Result<PrayerRequest, sqlx::Error> {
    let request = sqlx::query_as::<_, PrayerRequest>(&sql(r#"
        INSERT INTO
            prayer_requests (
                id,
                title,
                content,
                is_anonymous,
                user_id,
                created_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            title,
            content,
            is_anonymous,
            user_id,
            created_at
    "#))
    .bind(Uuid::new_v4())
    .bind(input.title.trim())
    .bind(&input.content)
    .bind(input.is_anonymous)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(get_pool()?)
    .await?;

    Ok(request)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<PrayerRequest>, sqlx::Error> {
    let request = sqlx::query_as::<_, PrayerRequest>(&sql(r#"
        SELECT
            id,
            title,
            content,
            is_anonymous,
            user_id,
            created_at
        FROM
            prayer_requests
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(request)
}

pub async fn list_requests() -> Result<Vec<PrayerRequestView>, sqlx::Error> {
    let requests = sqlx::query_as::<_, PrayerRequestView>(&sql(r#"
        SELECT
            r.id,
            r.title,
            r.content,
            r.is_anonymous,
            r.user_id,
            u.name AS user_name,
            r.created_at
        FROM
            prayer_requests r
            LEFT JOIN users u ON u.id = r.user_id
        ORDER BY
            r.created_at DESC
    "#))
    .fetch_all(get_pool()?)
    .await?;

    Ok(requests)
}

pub async fn delete_request(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM prayer_requests WHERE id = ?"))
        .bind(id)
        .execute(get_pool()?)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
