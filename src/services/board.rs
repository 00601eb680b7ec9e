use uuid::Uuid;

use crate::database::{
    models::{BoardPost, BoardPostInput, BoardPostSummary, Department},
    repositories::board as board_repo,
};
use crate::error::AppError;
use crate::services::user_context::UserContext;

/// The board belongs to this department; its admins moderate the trash.
pub const BOARD_DEPARTMENT: Department = Department::Family;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostState {
    Active,
    Deleted,
    Purged,
}

impl From<&BoardPost> for PostState {
    fn from(post: &BoardPost) -> Self {
        if post.is_deleted {
            PostState::Deleted
        } else {
            PostState::Active
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    SoftDelete,
    Restore,
    Purge,
}

/// Active -> Deleted -> (Active | Purged). Purged is terminal.
pub fn transition(state: PostState, action: BoardAction) -> Result<PostState, AppError> {
    match (state, action) {
        (PostState::Active, BoardAction::SoftDelete) => Ok(PostState::Deleted),
        (PostState::Deleted, BoardAction::Restore) => Ok(PostState::Active),
        (PostState::Deleted, BoardAction::Purge) => Ok(PostState::Purged),
        (state, action) => Err(AppError::BadRequest(format!(
            "Cannot {:?} a post that is {:?}",
            action, state
        ))),
    }
}

pub async fn list_posts(ctx: &UserContext, trash: bool) -> Result<Vec<BoardPostSummary>, AppError> {
    if trash {
        ctx.requires_department_admin(BOARD_DEPARTMENT)?;
    }
    Ok(board_repo::list_posts(trash).await?)
}

/// Fetches a post, counting the view when it is active. Trashed posts are
/// only visible to board admins.
pub async fn view_post(ctx: &UserContext, id: Uuid) -> Result<BoardPost, AppError> {
    let not_found = || AppError::NotFound("Post not found".to_string());

    let post = board_repo::find_by_id(id).await?.ok_or_else(not_found)?;
    match PostState::from(&post) {
        PostState::Active => board_repo::increment_views(id).await?.ok_or_else(not_found),
        _ if ctx.is_department_admin(BOARD_DEPARTMENT) => Ok(post),
        _ => Err(not_found()),
    }
}

fn validate_input(input: &BoardPostInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Title and content are required".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_post(ctx: &UserContext, input: BoardPostInput) -> Result<BoardPost, AppError> {
    ctx.requires_department_member(BOARD_DEPARTMENT)?;
    validate_input(&input)?;

    let post = board_repo::create_post(ctx.user_id(), &input).await?;
    log::info!("Board post {} created by {}", post.id, post.author_id);
    Ok(post)
}

pub async fn edit_post(
    ctx: &UserContext,
    id: Uuid,
    input: BoardPostInput,
) -> Result<BoardPost, AppError> {
    validate_input(&input)?;
    let not_found = || AppError::NotFound("Post not found".to_string());

    let post = board_repo::find_by_id(id).await?.ok_or_else(not_found)?;
    if PostState::from(&post) != PostState::Active {
        return Err(not_found());
    }
    if post.author_id != ctx.user_id() && !ctx.is_department_admin(BOARD_DEPARTMENT) {
        return Err(AppError::Forbidden(
            "Only the author or a board admin may edit this post".to_string(),
        ));
    }

    board_repo::update_post(id, &input).await?.ok_or_else(not_found)
}

/// Moves a post through the trash lifecycle. Returns the post unless it was purged.
pub async fn apply_action(
    ctx: &UserContext,
    id: Uuid,
    action: BoardAction,
) -> Result<Option<BoardPost>, AppError> {
    ctx.requires_department_admin(BOARD_DEPARTMENT)?;
    let not_found = || AppError::NotFound("Post not found".to_string());

    let post = board_repo::find_by_id(id).await?.ok_or_else(not_found)?;
    let next = transition(PostState::from(&post), action)?;

    // The repository calls re-check the current state, so a concurrent change
    // surfaces as NotFound rather than a double transition.
    let result = match next {
        PostState::Deleted => Some(board_repo::set_deleted(id, true).await?.ok_or_else(not_found)?),
        PostState::Active => Some(board_repo::set_deleted(id, false).await?.ok_or_else(not_found)?),
        PostState::Purged => {
            board_repo::purge_post(id).await?.ok_or_else(not_found)?;
            None
        }
    };

    log::info!(
        "Board post {} moved to {:?} by {}",
        id,
        next,
        ctx.user_id()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::UserRole;
    use chrono::Utc;

    fn post(is_deleted: bool) -> BoardPost {
        BoardPost {
            id: Uuid::new_v4(),
            title: "Picnic".to_string(),
            content: "Bring a dish".to_string(),
            image_url: None,
            view_count: 0,
            is_deleted,
            deleted_at: is_deleted.then(Utc::now),
            author_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn state_follows_the_soft_delete_flag() {
        assert_eq!(PostState::from(&post(false)), PostState::Active);
        assert_eq!(PostState::from(&post(true)), PostState::Deleted);
    }

    #[test]
    fn allowed_transitions() {
        assert_eq!(
            transition(PostState::Active, BoardAction::SoftDelete).unwrap(),
            PostState::Deleted
        );
        assert_eq!(
            transition(PostState::Deleted, BoardAction::Restore).unwrap(),
            PostState::Active
        );
        assert_eq!(
            transition(PostState::Deleted, BoardAction::Purge).unwrap(),
            PostState::Purged
        );
    }

    #[test]
    fn purge_requires_the_trash_and_purged_is_terminal() {
        assert!(transition(PostState::Active, BoardAction::Purge).is_err());
        assert!(transition(PostState::Active, BoardAction::Restore).is_err());
        assert!(transition(PostState::Deleted, BoardAction::SoftDelete).is_err());

        for action in [BoardAction::SoftDelete, BoardAction::Restore, BoardAction::Purge] {
            assert!(matches!(
                transition(PostState::Purged, action),
                Err(AppError::BadRequest(_))
            ));
        }
    }

    #[actix_web::test]
    async fn trash_is_hidden_from_non_admins_before_any_lookup() {
        let member = UserContext {
            user_id: Uuid::new_v4(),
            email: "member@example.com".to_string(),
            role: UserRole::Member,
            department: BOARD_DEPARTMENT,
        };

        assert!(matches!(
            list_posts(&member, true).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            apply_action(&member, Uuid::new_v4(), BoardAction::Purge).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
