use actix_web::web;

use crate::handlers::news;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/news")
            .route("", web::get().to(news::list_news))
            .route("", web::post().to(news::create_news))
            .route("/events", web::get().to(news::list_events))
            .route("/{id}", web::get().to(news::get_news))
            .route("/{id}", web::put().to(news::update_news))
            .route("/{id}", web::delete().to(news::delete_news)),
    );
}
