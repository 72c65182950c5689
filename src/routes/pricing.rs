use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::models::pricing::{ApiResponse, PricingCalendar, Travelers};
use crate::services::pricing_calendar_service::{PricingCalendarService, PricingError, PricingRequest};
use crate::services::tourplan::HostConnect;

const DEFAULT_ADULTS: u32 = 2;
const DEFAULT_CHILDREN: u32 = 0;
const DEFAULT_ROOM_TYPE: &str = "DB";

/// Raw query values. Counts stay strings so a bad value falls back to its
/// default instead of rejecting the request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingQuery {
    date_from: Option<String>,
    date_to: Option<String>,
    adults: Option<String>,
    children: Option<String>,
    room_type: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn count_or(value: &Option<String>, default: u32) -> u32 {
    non_blank(value).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn optional_date(value: &Option<String>) -> Result<Option<NaiveDate>, PricingError> {
    non_blank(value).map(PricingCalendarService::parse_date).transpose()
}

impl PricingQuery {
    fn travelers(&self) -> Travelers {
        Travelers {
            adults: count_or(&self.adults, DEFAULT_ADULTS),
            children: count_or(&self.children, DEFAULT_CHILDREN),
            room_type: non_blank(&self.room_type).unwrap_or(DEFAULT_ROOM_TYPE).to_string(),
        }
    }
}

/// Pricing must never be served stale by an intermediary cache.
fn uncached(status: StatusCode) -> HttpResponseBuilder {
    let mut builder = HttpResponse::build(status);
    builder
        .insert_header((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
        .insert_header((header::PRAGMA, "no-cache"))
        .insert_header((header::EXPIRES, "0"));
    builder
}

/*
    /api/tourplan/pricing/{productCode}?dateFrom&dateTo&adults&children&roomType
*/
pub async fn get_pricing_calendar<C: HostConnect + 'static>(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<PricingQuery>,
    client: web::Data<C>,
) -> HttpResponse {
    let product_code = path.into_inner();
    let referer = req
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let result = match (optional_date(&query.date_from), optional_date(&query.date_to)) {
        (Ok(date_from), Ok(date_to)) => {
            let request = PricingRequest {
                product_code,
                date_from,
                date_to,
                travelers: query.travelers(),
                referer,
            };
            PricingCalendarService::get_pricing_calendar(client.get_ref(), &request, Utc::now().date_naive()).await
        }
        (Err(e), _) | (_, Err(e)) => Err(e),
    };

    match result {
        Ok(calendar) => uncached(StatusCode::OK).json(ApiResponse::ok(calendar)),
        Err(e) => {
            log::error!("Error getting pricing calendar: {}", e);
            uncached(StatusCode::INTERNAL_SERVER_ERROR).json(ApiResponse::<PricingCalendar>::failure(
                "Failed to get pricing calendar",
                e.to_string(),
            ))
        }
    }
}
