use actix_web::{HttpRequest, HttpResponse, Result, web};

use crate::config::Config;
use crate::database::models::{CreateUserInput, LoginInput, UserInfo};
use crate::database::repositories::user as user_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{auth, user_context::extract_context};

pub async fn register(
    config: web::Data<Config>,
    request: web::Json<CreateUserInput>,
) -> Result<HttpResponse> {
    let response = auth::register(request.into_inner(), &config).await?;

    Ok(ApiResponse::created(response))
}

pub async fn login(
    config: web::Data<Config>,
    request: web::Json<LoginInput>,
) -> Result<HttpResponse> {
    let response = auth::login(request.into_inner(), &config).await?;

    Ok(ApiResponse::success(response))
}

pub async fn me(req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let user_id = user_context.user_id();

    let user = user_repo::find_by_id(user_id).await.map_err(|e| {
        log::error!("Failed to load user {}: {}", user_id, e);
        AppError::DatabaseError(e)
    })?;
    let user = user.ok_or(AppError::UserNotFound(user_id))?;

    Ok(ApiResponse::success(UserInfo::from(user)))
}
