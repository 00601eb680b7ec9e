use actix_web::{HttpRequest, HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::models::{PrayerSubjectInput, PrayerSubjectQuery};
use crate::database::repositories::prayer_subject as subject_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::user_context::extract_context;

fn validate(input: &PrayerSubjectInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    Ok(())
}

pub async fn list_subjects(
    query: web::Query<PrayerSubjectQuery>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;

    // Inactive subjects are an admin view
    let include_inactive = query.include_inactive && user_context.is_admin();
    let subjects = subject_repo::list_subjects(query.department, include_inactive)
        .await
        .map_err(|e| {
            log::error!("Failed to list prayer subjects: {}", e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(subjects))
}

pub async fn create_subject(
    input: web::Json<PrayerSubjectInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    user_context.requires_department_admin(input.department)?;
    validate(&input)?;

    let subject = subject_repo::create_subject(&input)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::created(subject))
}

pub async fn update_subject(
    path: web::Path<Uuid>,
    input: web::Json<PrayerSubjectInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let subject_id = path.into_inner();
    validate(&input)?;

    let existing = subject_repo::find_by_id(subject_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Prayer subject not found".to_string()))?;

    // Moving a subject needs admin rights over both departments
    user_context.requires_department_admin(existing.department)?;
    user_context.requires_department_admin(input.department)?;

    let subject = subject_repo::update_subject(subject_id, &input)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Prayer subject not found".to_string()))?;

    Ok(ApiResponse::success(subject))
}

pub async fn delete_subject(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let subject_id = path.into_inner();

    let existing = subject_repo::find_by_id(subject_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Prayer subject not found".to_string()))?;
    user_context.requires_department_admin(existing.department)?;

    subject_repo::delete_subject(subject_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Prayer subject not found".to_string()))?;

    Ok(ApiResponse::success_message("Prayer subject deleted"))
}
