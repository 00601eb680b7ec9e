pub(crate) mod macros;

pub mod auth;
pub mod board;
pub mod moderator_schedule;
pub mod news;
pub mod prayer_request;
pub mod prayer_subject;
pub mod prayer_team;
pub mod user;

// Re-export all models for easy importing
pub use auth::*;
pub use board::*;
pub use moderator_schedule::*;
pub use news::*;
pub use prayer_request::*;
pub use prayer_subject::*;
pub use prayer_team::*;
pub use user::*;
