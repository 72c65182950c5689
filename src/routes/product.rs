use actix_web::{web, HttpResponse};

use crate::models::pricing::ApiResponse;
use crate::models::product::ProductDetails;
use crate::services::product_service::ProductService;
use crate::services::tourplan::{HostConnect, TourPlanError};

/*
    /api/tourplan/products/{productCode}
*/
pub async fn get_product_details<C: HostConnect + 'static>(
    path: web::Path<String>,
    client: web::Data<C>,
) -> HttpResponse {
    let product_code = path.into_inner();

    match ProductService::get_product_details(client.get_ref(), &product_code).await {
        Ok(details) => HttpResponse::Ok().json(ApiResponse::ok(details)),
        Err(TourPlanError::NotFound(code)) => HttpResponse::NotFound().json(
            ApiResponse::<ProductDetails>::failure("Product not found", format!("No product with code {}", code)),
        ),
        Err(e) => {
            log::error!("Failed to get product details for {}: {}", product_code, e);
            HttpResponse::InternalServerError().json(ApiResponse::<ProductDetails>::failure(
                "Failed to get product details",
                e.to_string(),
            ))
        }
    }
}
