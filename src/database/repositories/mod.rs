pub mod board;
pub mod moderator_schedule;
pub mod news;
pub mod prayer_request;
pub mod prayer_subject;
pub mod prayer_team;
pub mod user;
