use actix_web::web;

use crate::handlers::prayer_subjects;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prayer-subjects")
            .route("", web::get().to(prayer_subjects::list_subjects))
            .route("", web::post().to(prayer_subjects::create_subject))
            .route("/{id}", web::put().to(prayer_subjects::update_subject))
            .route("/{id}", web::delete().to(prayer_subjects::delete_subject)),
    );
}
