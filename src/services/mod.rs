pub mod auth;
pub mod board;
pub mod moderator_rotation;
pub mod prayer_teams;
pub mod schedule_cleanup;
pub mod user_context;
pub mod week;

pub use user_context::UserContext;
