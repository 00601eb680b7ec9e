use actix_web::{HttpRequest, HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::models::{PrayerRequestInput, PrayerRequestView};
use crate::database::repositories::prayer_request as request_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;
use crate::services::user_context::{extract_context, extract_optional_context};

/// Signed-in callers are recorded as the owner unless they ask for anonymity;
/// unauthenticated submissions are always anonymous.
pub async fn create_request(
    input: web::Json<PrayerRequestInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_context = extract_optional_context(&req)?;
    let mut input = input.into_inner();

    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(AppError::BadRequest("Title and content are required".to_string()).into());
    }

    input.is_anonymous |= user_context.is_none();
    let owner = user_context
        .filter(|_| !input.is_anonymous)
        .map(|ctx| ctx.user_id());

    let request = request_repo::create_request(&input, owner)
        .await
        .map_err(|e| {
            log::error!(
                "Failed to create prayer request [{}]: {}",
                req.correlation_id().unwrap_or_default(),
                e
            );
            AppError::DatabaseError(e)
        })?;

    let view = PrayerRequestView {
        id: request.id,
        title: request.title,
        content: request.content,
        is_anonymous: request.is_anonymous,
        user_id: request.user_id,
        user_name: None,
        created_at: request.created_at,
    };

    Ok(ApiResponse::created(view.redacted()))
}

pub async fn list_requests(req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?;

    let requests: Vec<PrayerRequestView> = request_repo::list_requests()
        .await
        .map_err(AppError::from)?
        .into_iter()
        .map(PrayerRequestView::redacted)
        .collect();

    Ok(ApiResponse::success(requests))
}

pub async fn delete_request(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let request_id = path.into_inner();

    let request = request_repo::find_by_id(request_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Prayer request not found".to_string()))?;

    match request.user_id {
        Some(owner_id) => user_context.requires_same_user_or_admin(owner_id)?,
        None => user_context.requires_admin()?,
    }

    request_repo::delete_request(request_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Prayer request not found".to_string()))?;

    Ok(ApiResponse::success_message("Prayer request deleted"))
}
