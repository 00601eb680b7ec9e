use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{User, UserRole},
    utils::sql,
};

pub async fn create_user(
    tx: &mut Transaction<'_, Postgres>,
    user: &User,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&sql(r#"
        INSERT INTO
            users (
                id,
                name,
                email,
                password_hash,
                role,
                department,
                birthday,
                created_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            name,
            email,
            password_hash,
            role,
            department,
            birthday,
            created_at
    "#))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(user.department)
    .bind(user.birthday)
    .bind(user.created_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(user)
}

pub async fn find_by_email(email: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&sql(r#"
        SELECT
            id,
            name,
            email,
            password_hash,
            role,
            department,
            birthday,
            created_at
        FROM
            users
        WHERE
            email = ?
    "#))
    .bind(email)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(user)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&sql(r#"
        SELECT
            id,
            name,
            email,
            password_hash,
            role,
            department,
            birthday,
            created_at
        FROM
            users
        WHERE
            id = ?
    "#))
    .bind(id)
    .fetch_optional(get_pool()?)
    .await?;

    Ok(user)
}

/// All users, oldest account first. This ordering is the rotation pool order.
pub async fn get_all_users() -> Result<Vec<User>, sqlx::Error> {
    let users = sqlx::query_as::<_, User>(&sql(r#"
        SELECT
            id,
            name,
            email,
            password_hash,
            role,
            department,
            birthday,
            created_at
        FROM
            users
        ORDER BY
            created_at ASC,
            id ASC
    "#))
    .fetch_all(get_pool()?)
    .await?;

    Ok(users)
}

pub async fn email_exists(email: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(&sql(r#"
        SELECT
            COUNT(*)
        FROM
            users
        WHERE
            email = ?
    "#))
    .bind(email)
    .fetch_one(get_pool()?)
    .await?;

    Ok(count > 0)
}

pub async fn count_admins(tx: &mut Transaction<'_, Postgres>) -> Result<i64, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(&sql(r#"
        SELECT
            COUNT(*)
        FROM
            users
        WHERE
            role = ?
    "#))
    .bind(UserRole::Admin)
    .fetch_one(&mut **tx)
    .await?;

    Ok(count)
}

pub async fn update_role(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    role: UserRole,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&sql(r#"
        UPDATE users
        SET
            role = ?
        WHERE
            id = ?
        RETURNING
            id,
            name,
            email,
            password_hash,
            role,
            department,
            birthday,
            created_at
    "#))
    .bind(role)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(user)
}
