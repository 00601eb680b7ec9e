use actix_web::web;

pub mod auth;
pub mod board;
pub mod moderator_schedules;
pub mod news;
pub mod prayer_requests;
pub mod prayer_subjects;
pub mod prayer_teams;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(users::configure)
            .configure(moderator_schedules::configure)
            .configure(prayer_teams::configure)
            .configure(prayer_requests::configure)
            .configure(prayer_subjects::configure)
            .configure(news::configure)
            .configure(board::configure),
    );
}
