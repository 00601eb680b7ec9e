use actix_web::web;

use crate::handlers::moderator_schedules;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/moderator-schedules")
            .route("", web::get().to(moderator_schedules::list_schedules))
            .route("", web::post().to(moderator_schedules::create_schedule))
            .route(
                "/generate",
                web::post().to(moderator_schedules::generate_schedules),
            )
            .route(
                "/cleanup-duplicates",
                web::post().to(moderator_schedules::cleanup_duplicates),
            )
            .route("/{id}", web::get().to(moderator_schedules::get_schedule))
            .route("/{id}", web::put().to(moderator_schedules::update_schedule))
            .route(
                "/{id}",
                web::delete().to(moderator_schedules::delete_schedule),
            ),
    );
}
