use actix_web::web;

use crate::handlers::prayer_teams;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/prayer-teams")
            .route("", web::get().to(prayer_teams::list_week))
            .route("", web::post().to(prayer_teams::create_team))
            .route("/mine", web::get().to(prayer_teams::list_mine))
            .route("/generate", web::post().to(prayer_teams::generate_teams))
            .route("/week", web::delete().to(prayer_teams::clear_week))
            .route("/{id}", web::put().to(prayer_teams::update_team))
            .route("/{id}", web::delete().to(prayer_teams::delete_team)),
    );
}
