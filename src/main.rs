use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;
use env_logger::Env;

use fellowship::Config;
use fellowship::database::init_database;
use fellowship::middleware::RequestIdMiddleware;
use fellowship::routes;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Fellowship API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    let default_filter = if config.is_development() {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    log::info!(
        "Starting Fellowship API (environment: {})",
        config.environment
    );

    init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let server_address = config.server_address();
    let config_data = web::Data::new(config.clone());
    log::info!("Listening on http://{}", server_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_origin(&config.client_base_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "Authorization",
                "Content-Type",
                "Accept",
                "X-Requested-With",
                "X-Correlation-ID",
            ])
            .expose_headers(vec!["X-Correlation-ID"])
            .max_age(3600);
        if !config.is_production() {
            cors = cors.allowed_origin("http://127.0.0.1:3000");
        }

        App::new()
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
