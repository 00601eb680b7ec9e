use actix_web::web;

use crate::handlers::prayer_requests;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prayer-requests")
            .route("", web::get().to(prayer_requests::list_requests))
            .route("", web::post().to(prayer_requests::create_request))
            .route("/{id}", web::delete().to(prayer_requests::delete_request)),
    );
}
