use actix_web::{HttpRequest, HttpResponse, Result, web};
use uuid::Uuid;

use crate::database::models::BoardPostInput;
use crate::handlers::shared::ApiResponse;
use crate::services::{
    board::{self, BoardAction},
    user_context::extract_context,
};

pub async fn list_posts(req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let posts = board::list_posts(&user_context, false).await?;

    Ok(ApiResponse::success(posts))
}

pub async fn list_trash(req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let posts = board::list_posts(&user_context, true).await?;

    Ok(ApiResponse::success(posts))
}

pub async fn get_post(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let post = board::view_post(&user_context, path.into_inner()).await?;

    Ok(ApiResponse::success(post))
}

pub async fn create_post(
    input: web::Json<BoardPostInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let post = board::create_post(&user_context, input.into_inner()).await?;

    Ok(ApiResponse::created(post))
}

pub async fn update_post(
    path: web::Path<Uuid>,
    input: web::Json<BoardPostInput>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let post = board::edit_post(&user_context, path.into_inner(), input.into_inner()).await?;

    Ok(ApiResponse::success(post))
}

pub async fn delete_post(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let post = board::apply_action(&user_context, path.into_inner(), BoardAction::SoftDelete).await?;

    Ok(ApiResponse::success_with_message(post, "Post moved to trash"))
}

pub async fn restore_post(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    let post = board::apply_action(&user_context, path.into_inner(), BoardAction::Restore).await?;

    Ok(ApiResponse::success_with_message(post, "Post restored"))
}

pub async fn purge_post(path: web::Path<Uuid>, req: HttpRequest) -> Result<HttpResponse> {
    let user_context = extract_context(&req)?;
    board::apply_action(&user_context, path.into_inner(), BoardAction::Purge).await?;

    Ok(ApiResponse::success_message("Post permanently deleted"))
}
