use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{Department, News, NewsInput},
    utils::sql,
};

pub async fn create_news(input: &NewsInput) -> Result<News, sqlx::Error> {
    let news = sqlx::query_as::<_, News>(&sql(r#"
        INSERT INTO
            news (
                id,
                title,
                content,
                event_date,
                is_event,
                department,
                created_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            title,
            content,
            event_date,
            is_event,
            department,
            created_at
    "#))
    .bind(Uuid::new_v4())
    .bind(input.title.trim())
    .bind(&input.content)
    .bind(input.event_date)
    .bind(input.is_event)
    .bind(input.department)
    .bind(Utc::now())
    .fetch_one(get_pool()?)
    .await?;

    Ok(news)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<News>, sqlx::Error> {
    let news = sqlx::query_as::<_, News>(&sql(r#"
        SELECT
            id,
            title,
            content,
            event_date,
            is_event,
            department,
            created_at
        FROM
            news
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(news)
}

pub async fn list_news(department: Option<Department>) -> Result<Vec<News>, sqlx::Error> {
    let news = sqlx::query_as::<_, News>(&sql(r#"
        SELECT
            id,
            title,
            content,
            event_date,
            is_event,
            department,
            created_at
        FROM
            news
        WHERE
            ?::VARCHAR IS NULL OR department = ?
        ORDER BY
            created_at DESC
    "#))
    .bind(department)
    .bind(department)
    .fetch_all(get_pool()?)
    .await?;

    Ok(news)
}

/// Events dated on or after `from`, soonest first.
pub async fn list_upcoming_events(
    from: NaiveDate,
    department: Option<Department>,
) -> Result<Vec<News>, sqlx::Error> {
    let events = sqlx::query_as::<_, News>(&sql(r#"
        SELECT
            id,
            title,
            content,
            event_date,
            is_event,
            department,
            created_at
        FROM
            news
        WHERE
            is_event
            AND event_date >= ?
            AND (?::VARCHAR IS NULL OR department = ?)
        ORDER BY
            event_date ASC
    "#))
    .bind(from)
    .bind(department)
    .bind(department)
    .fetch_all(get_pool()?)
    .await?;

    Ok(events)
}

pub async fn update_news(id: Uuid, input: &NewsInput) -> Result<Option<News>, sqlx::Error> {
    let news = sqlx::query_as::<_, News>(&sql(r#"
        UPDATE news
        SET
            title = ?,
            content = ?,
            event_date = ?,
            is_event = ?,
            department = ?
        WHERE
            id = ?
        RETURNING
            id,
            title,
            content,
            event_date,
            is_event,
            department,
            created_at
    "#))
    .bind(input.title.trim())
    .bind(&input.content)
    .bind(input.event_date)
    .bind(input.is_event)
    .bind(input.department)
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(news)
}

pub async fn delete_news(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM news WHERE id = ?"))
        .bind(id)
        .execute(get_pool()?)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
