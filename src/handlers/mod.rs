pub mod auth;
pub mod board;
pub mod moderator_schedules;
pub mod news;
pub mod prayer_requests;
pub mod prayer_subjects;
pub mod prayer_teams;
pub mod shared;
pub mod users;
