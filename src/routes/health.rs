use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;
use std::env;

use crate::config::TourPlanConfig;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

/*
    /health
*/
pub async fn health_check(config: web::Data<TourPlanConfig>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let tourplan = check_tourplan(&config);
    if tourplan.status != "ok" {
        health.status = "degraded".to_string();
    }
    health.services.insert("tourplan".to_string(), tourplan);

    HttpResponse::Ok().json(health)
}

// Configuration only; HostConnect has no cheap ping request.
fn check_tourplan(config: &TourPlanConfig) -> ServiceStatus {
    match url::Url::parse(&config.endpoint) {
        Ok(endpoint) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "HostConnect configured, host: {}, agent: {}, timeout: {}s",
                endpoint.host_str().unwrap_or("unknown"),
                config.masked_agent_id(),
                config.timeout.as_secs()
            )),
        },
        Err(e) => {
            log::warn!("TourPlan endpoint is not a valid URL: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Invalid TourPlan endpoint: {}", e)),
            }
        }
    }
}
