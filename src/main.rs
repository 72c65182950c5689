use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use thisisafrica_api::config::TourPlanConfig;
use thisisafrica_api::routes;
use thisisafrica_api::services::tourplan::TourPlanClient;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        log::info!("Release mode");
    }

    let config = TourPlanConfig::from_env().map_err(|e| {
        log::error!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    config.log_config();

    let client = TourPlanClient::new(config.clone()).map_err(|e| {
        log::error!("Failed to build HostConnect client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    log::info!("Starting HTTP server on {}:{}", host, port);

    let client = web::Data::new(client);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::default().allow_any_origin().allowed_methods(vec!["GET"]).max_age(3600))
            .app_data(client.clone())
            .app_data(config.clone())
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api/tourplan")
                    .route(
                        "/pricing/{productCode}",
                        web::get().to(routes::pricing::get_pricing_calendar::<TourPlanClient>),
                    )
                    .route(
                        "/products/{productCode}",
                        web::get().to(routes::product::get_product_details::<TourPlanClient>),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
