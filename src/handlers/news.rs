use actix_web::{HttpRequest, HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::models::{NewsInput, NewsQuery};
use crate::database::repositories::news as news_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::{user_context::extract_context, week};

pub fn validate(input: &NewsInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Title and content are required".to_string(),
        ));
    }
    if input.is_event && input.event_date.is_none() {
        return Err(AppError::BadRequest(
            "Events require an eventDate".to_string(),
        ));
    }
    Ok(())
}

pub async fn list_news(query: web::Query<NewsQuery>, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?;

    let news = news_repo::list_news(query.department).await.map_err(|e| {
        log::error!("Failed to list news: {}", e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::success(news))
}

pub async fn list_events(query: web::Query<NewsQuery>, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?;

    let events = news_repo::list_upcoming_events(week::today(), query.department)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(events))
}

pub async fn get_news(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?;

    let news = news_repo::find_by_id(path.into_inner())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("News not found".to_string()))?;

    Ok(ApiResponse::success(news))
}

pub async fn create_news(input: web::Json<NewsInput>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    user_context.requires_department_admin(input.department)?;
    validate(&input)?;

    let news = news_repo::create_news(&input).await.map_err(AppError::from)?;
    log::info!("News {} published by {}", news.id, user_context.user_id());

    Ok(ApiResponse::created(news))
}

pub async fn update_news(
    path: web::Path<Uuid>,
    input: web::Json<NewsInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let news_id = path.into_inner();
    validate(&input)?;

    let existing = news_repo::find_by_id(news_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("News not found".to_string()))?;
    user_context.requires_department_admin(existing.department)?;
    user_context.requires_department_admin(input.department)?;

    let news = news_repo::update_news(news_id, &input)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("News not found".to_string()))?;

    Ok(ApiResponse::success(news))
}

pub async fn delete_news(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let news_id = path.into_inner();

    let existing = news_repo::find_by_id(news_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("News not found".to_string()))?;
    user_context.requires_department_admin(existing.department)?;

    news_repo::delete_news(news_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("News not found".to_string()))?;

    Ok(ApiResponse::success_message("News deleted"))
}
