use actix_web::web;

use crate::handlers::board;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/board")
            .route("", web::get().to(board::list_posts))
            .route("", web::post().to(board::create_post))
            .route("/trash", web::get().to(board::list_trash))
            .route("/{id}", web::get().to(board::get_post))
            .route("/{id}", web::put().to(board::update_post))
            .route("/{id}", web::delete().to(board::delete_post))
            .route("/{id}/restore", web::post().to(board::restore_post))
            .route("/{id}/purge", web::delete().to(board::purge_post)),
    );
}
