use chrono::Utc;
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{BoardPost, BoardPostInput, BoardPostSummary},
    utils::sql,
};

pub async fn create_post(author_id: Uuid, input: &BoardPostInput) -> Result<BoardPost, sqlx::Error> {
    let now = Utc::now();
    let post = sqlx::query_as::<_, BoardPost>(&sql(r#"
        INSERT INTO
            board_posts (
                id,
                title,
                content,
                image_url,
                author_id,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            title,
            content,
            image_url,
            view_count,
            is_deleted,
            deleted_at,
            author_id,
            created_at,
            updated_at
    "#))
    .bind(Uuid::new_v4())
    .bind(input.title.trim())
    .bind(&input.content)
    .bind(&input.image_url)
    .bind(author_id)
    .bind(now)
    .bind(now)
    .fetch_one(get_pool()?)
    .await?;

    Ok(post)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<BoardPost>, sqlx::Error> {
    let post = sqlx::query_as::<_, BoardPost>(&sql(r#"
        SELECT
            id,
            title,
            content,
            image_url,
            view_count,
            is_deleted,
            deleted_at,
            author_id,
            created_at,
            updated_at
        FROM
            board_posts
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(post)
}

/// Active posts when `deleted` is false, the trash otherwise.
pub async fn list_posts(deleted: bool) -> Result<Vec<BoardPostSummary>, sqlx::Error> {
    let posts = sqlx::query_as::<_, BoardPostSummary>(&sql(r#"
        SELECT
            p.id,
            p.title,
            p.image_url,
            p.view_count,
            p.is_deleted,
            p.deleted_at,
            p.author_id,
            u.name AS author_name,
            p.created_at
        FROM
            board_posts p
            INNER JOIN users u ON u.id = p.author_id
        WHERE
            p.is_deleted = ?
        ORDER BY
            p.created_at DESC
    "#))
    .bind(deleted)
    .fetch_all(get_pool()?)
    .await?;

    Ok(posts)
}

pub async fn increment_views(id: Uuid) -> Result<Option<BoardPost>, sqlx::Error> {
    let post = sqlx::query_as::<_, BoardPost>(&sql(r#"
        UPDATE board_posts
        SET
            view_count = view_count + 1
        WHERE
            id = ?
            AND NOT is_deleted
        RETURNING
            id,
            title,
            content,
            image_url,
            view_count,
            is_deleted,
            deleted_at,
            author_id,
            created_at,
            updated_at
    "#))
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(post)
}

pub async fn update_post(
    id: Uuid,
    input: &BoardPostInput,
) -> Result<Option<BoardPost>, sqlx::Error> {
    let post = sqlx::query_as::<_, BoardPost>(&sql(r#"
        UPDATE board_posts
        SET
            title = ?,
            content = ?,
            image_url = ?,
            updated_at = ?
        WHERE
            id = ?
            AND NOT is_deleted
        RETURNING
            id,
            title,
            content,
            image_url,
            view_count,
            is_deleted,
            deleted_at,
            author_id,
            created_at,
            updated_at
    "#))
    .bind(input.title.trim())
    .bind(&input.content)
    .bind(&input.image_url)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(post)
}

/// Flips the soft-delete flag; only matches rows currently in the opposite state.
pub async fn set_deleted(id: Uuid, deleted: bool) -> Result<Option<BoardPost>, sqlx::Error> {
    let deleted_at = deleted.then(Utc::now);
    let post = sqlx::query_as::<_, BoardPost>(&sql(r#"
        UPDATE board_posts
        SET
            is_deleted = ?,
            deleted_at = ?
        WHERE
            id = ?
            AND is_deleted = ?
        RETURNING
            id,
            title,
            content,
            image_url,
            view_count,
            is_deleted,
            deleted_at,
            author_id,
            created_at,
            updated_at
    "#))
    .bind(deleted)
    .bind(deleted_at)
    .bind(id)
    .bind(!deleted)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(post)
}

/// Permanently removes a post that is already in the trash.
pub async fn purge_post(id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql(
        "DELETE FROM board_posts WHERE id = ? AND is_deleted",
    ))
    .bind(id)
    .execute(get_pool()?)
    .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
