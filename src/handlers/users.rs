use actix_web::{HttpRequest, HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::models::{UpdateUserRoleInput, UserInfo};
use crate::database::repositories::user as user_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{auth, user_context::extract_context};

pub async fn list_users(req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    user_context.requires_admin()?;

    let users: Vec<UserInfo> = user_repo::get_all_users()
        .await
        .map_err(|e| {
            log::error!("Failed to list users: {}", e);
            AppError::DatabaseError(e)
        })?
        .into_iter()
        .map(UserInfo::from)
        .collect();

    Ok(ApiResponse::success(users))
}

pub async fn get_user(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let user_id = path.into_inner();
    user_context.requires_same_user_or_admin(user_id)?;

    let user = user_repo::find_by_id(user_id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::UserNotFound(user_id))?;

    Ok(ApiResponse::success(UserInfo::from(user)))
}

pub async fn update_role(
    path: web::Path<Uuid>,
    input: web::Json<UpdateUserRoleInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    user_context.requires_admin()?;

    let user = auth::update_role(path.into_inner(), input.role).await?;

    Ok(ApiResponse::success_with_message(
        UserInfo::from(user),
        "Role updated",
    ))
}
