use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{GenerateTeamsInput, PrayerTeamDetail, PrayerTeamInput, WeekQuery};
use crate::database::repositories::prayer_team as team_repo;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, optional_json};
use crate::services::{
    prayer_teams,
    user_context::extract_context,
    week::{self, WeekRange},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTeamsResponse {
    pub week_start: chrono::NaiveDate,
    pub week_end: chrono::NaiveDate,
    pub teams: Vec<PrayerTeamDetail>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearWeekResponse {
    pub deleted_count: u64,
    pub week_start: chrono::NaiveDate,
    pub week_end: chrono::NaiveDate,
}

pub async fn list_week(query: web::Query<WeekQuery>, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?;

    let range = WeekRange::resolve(query.week_start, query.week_end, week::today())?;
    let teams = team_repo::list_by_week(range.start, range.end)
        .await
        .map_err(|e| {
            log::error!("Failed to list prayer teams for {}: {}", range.start, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::success(WeekTeamsResponse {
        week_start: range.start,
        week_end: range.end,
        teams,
    }))
}

/// Teams of the caller from the current week onwards.
pub async fn list_mine(req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;

    let from = week::week_range(week::today()).start;
    let teams = team_repo::list_for_member(user_context.user_id(), from)
        .await
        .map_err(AppError::from)?;

    Ok(ApiResponse::success(teams))
}

pub async fn generate_teams(body: web::Bytes, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    let input: GenerateTeamsInput = optional_json(&body)?;
    let response = prayer_teams::generate_teams(input).await?;

    Ok(ApiResponse::created(response))
}

pub async fn create_team(
    input: web::Json<PrayerTeamInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    let team = prayer_teams::save_team(input.into_inner(), None).await?;

    Ok(ApiResponse::created(team))
}

pub async fn update_team(
    path: web::Path<Uuid>,
    input: web::Json<PrayerTeamInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    let team = prayer_teams::save_team(input.into_inner(), Some(path.into_inner())).await?;

    Ok(ApiResponse::success(team))
}

pub async fn delete_team(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    team_repo::delete_team(path.into_inner())
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Prayer team not found".to_string()))?;

    Ok(ApiResponse::success_message("Prayer team deleted"))
}

pub async fn clear_week(query: web::Query<WeekQuery>, req: HttpRequest) -> Result<HttpResponse> {
    extract_context(&req)?.requires_admin()?;

    let range = WeekRange::resolve(query.week_start, query.week_end, week::today())?;
    let deleted_count = prayer_teams::clear_week(range).await?;

    Ok(ApiResponse::success(ClearWeekResponse {
        deleted_count,
        week_start: range.start,
        week_end: range.end,
    }))
}
