use actix_web::{HttpRequest, HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::models::{GenerateScheduleInput, ModeratorScheduleInput, ScheduleRangeQuery};
use crate::database::repositories::moderator_schedule as schedule_repo;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, optional_json};
use crate::services::{moderator_rotation, schedule_cleanup, user_context::extract_context};

pub async fn list_schedules(
    query: web::Query<ScheduleRangeQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    extract_context(&req)?;

    let schedules = schedule_repo::list_range(query.from, query.to)
        .await
        .map_err(|e| {
            log::error!("Failed to list moderator schedules: {}", e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(schedules))
}

pub async fn get_schedule(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?;

    let schedule = schedule_repo::find_by_id(path.into_inner())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Moderator schedule not found".to_string()))?;

    Ok(ApiResponse::success(schedule))
}

pub async fn create_schedule(
    input: web::Json<ModeratorScheduleInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    let schedule = moderator_rotation::save_schedule(input.into_inner(), None).await?;

    Ok(ApiResponse::created(schedule))
}

pub async fn update_schedule(
    path: web::Path<Uuid>,
    input: web::Json<ModeratorScheduleInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    let schedule =
        moderator_rotation::save_schedule(input.into_inner(), Some(path.into_inner())).await?;

    Ok(ApiResponse::success(schedule))
}

pub async fn delete_schedule(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    schedule_repo::delete_schedule(path.into_inner())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Moderator schedule not found".to_string()))?;

    Ok(ApiResponse::success_message("Moderator schedule deleted"))
}

/// The body is optional; when omitted the default number of weeks is used.
pub async fn generate_schedules(body: web::Bytes, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    let input: GenerateScheduleInput = optional_json(&body)?;
    let response = moderator_rotation::generate_schedule(input.weeks_to_generate).await?;

    Ok(ApiResponse::created(response))
}

pub async fn cleanup_duplicates(req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    let response = schedule_cleanup::cleanup_duplicates().await?;

    Ok(ApiResponse::success(response))
}
