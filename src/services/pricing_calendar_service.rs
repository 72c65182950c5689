//! Pricing calendar for one product: fetch, pick a rate source, materialize.
//!
//! Rate ranges come from the first provider that yields any:
//! rail override, upstream date ranges, upstream stay total, the product
//! details lookup, and finally a "Contact for Pricing" placeholder. The
//! calendar is therefore never empty for lack of data.

use chrono::{Months, NaiveDate};
use thiserror::Error;

use crate::models::pricing::{DateRangeParams, PricingCalendar, RateRange, RateSource, Travelers};
use crate::services::calendar_service::{self, CalendarRequest};
use crate::services::product_classifier;
use crate::services::product_overrides;
use crate::services::product_service::ProductService;
use crate::services::rate_normalizer::{self, NormalizedOption, DEFAULT_CURRENCY, DEFAULT_RATE_NAME};
use crate::services::tourplan::xml_builder::INFO_PRICING;
use crate::services::tourplan::xml_parser::extract_reply;
use crate::services::tourplan::{HostConnect, OptionInfoRequest, RoomConfig, TourPlanError};

pub const CONTACT_FOR_PRICING: &str = "Contact for Pricing";
pub const DEFAULT_MONTHS: u32 = 6;
pub const DEFAULT_RAIL_MONTHS: u32 = 12;
/// Longest span a single calendar request may cover.
pub const MAX_RANGE_MONTHS: u32 = 24;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error(transparent)]
    TourPlan(#[from] TourPlanError),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Clone)]
pub struct PricingRequest {
    pub product_code: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub travelers: Travelers,
    pub referer: Option<String>,
}

/// Providers tried in order before the placeholder.
const FALLBACK_ORDER: [RateSource; 4] = [
    RateSource::RailOverride,
    RateSource::DateRanges,
    RateSource::StayResults,
    RateSource::ProductDetails,
];

pub struct PricingCalendarService;

impl PricingCalendarService {
    pub fn parse_date(raw: &str) -> Result<NaiveDate, PricingError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|e| PricingError::InvalidDate(format!("{:?}: {}", raw, e)))
    }

    /// `start` defaults to `today`, `end` to 6 months after `start` (12 for rail).
    /// Spans longer than `MAX_RANGE_MONTHS` are rejected.
    pub fn resolve_date_range(
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        rail: bool,
        today: NaiveDate,
    ) -> Result<(NaiveDate, NaiveDate), PricingError> {
        let start = date_from.unwrap_or(today);
        let end = match date_to {
            Some(end) => end,
            None => {
                let months = if rail { DEFAULT_RAIL_MONTHS } else { DEFAULT_MONTHS };
                start
                    .checked_add_months(Months::new(months))
                    .ok_or_else(|| PricingError::InvalidDate(format!("{} + {} months", start, months)))?
            }
        };

        if end < start {
            return Err(PricingError::InvalidDate(format!("dateTo {} is before dateFrom {}", end, start)));
        }
        if let Some(limit) = start.checked_add_months(Months::new(MAX_RANGE_MONTHS)) {
            if end > limit {
                return Err(PricingError::InvalidDate(format!(
                    "{} .. {} spans more than {} months",
                    start, end, MAX_RANGE_MONTHS
                )));
            }
        }
        Ok((start, end))
    }

    pub async fn get_pricing_calendar<C: HostConnect>(
        client: &C,
        request: &PricingRequest,
        today: NaiveDate,
    ) -> Result<PricingCalendar, PricingError> {
        let code = request.product_code.as_str();
        let rail = product_classifier::is_rail(code);
        let (start, end) = Self::resolve_date_range(request.date_from, request.date_to, rail, today)?;
        let product_type = product_classifier::classify(code, request.referer.as_deref());

        log::info!(
            "Pricing calendar for {} ({}) {} .. {}, {} adults, {} children, room {}",
            code,
            product_type.as_str(),
            start,
            end,
            request.travelers.adults,
            request.travelers.children,
            request.travelers.room_type
        );

        // Rail always ends up on the override table, so upstream is not asked.
        let upstream = if rail {
            NormalizedOption::default()
        } else {
            Self::fetch_upstream(client, request, start, end).await?
        };

        let (source, date_ranges) = Self::resolve_rate_ranges(client, code, &upstream, start, end).await;

        let anchor = date_ranges.first().map(|range| range.date_from).unwrap_or(start);
        let calendar = calendar_service::materialize(&CalendarRequest {
            rate_ranges: &date_ranges,
            start,
            end,
            product_code: code,
            is_accommodation: product_classifier::is_accommodation(code),
            opt_avail: upstream.opt_avail.as_deref(),
            opt_avail_anchor: anchor,
        });

        log::info!(
            "{}: {} calendar days from {:?} ({} rate ranges)",
            code,
            calendar.len(),
            source,
            date_ranges.len()
        );

        Ok(PricingCalendar {
            product_code: code.to_string(),
            product_type,
            source,
            date_range: DateRangeParams { from: start, to: end },
            travelers: request.travelers.clone(),
            calendar,
            date_ranges,
        })
    }

    async fn fetch_upstream<C: HostConnect>(
        client: &C,
        request: &PricingRequest,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<NormalizedOption, TourPlanError> {
        let (agent_id, password) = client.credentials();
        let xml = OptionInfoRequest::for_product(&request.product_code)
            .info(INFO_PRICING)
            .date_range(start, end)
            .room_configs(vec![RoomConfig {
                adults: request.travelers.adults,
                children: request.travelers.children,
                room_type: request.travelers.room_type.clone(),
            }])
            .build(agent_id, password);

        let root = client.send(xml).await?;
        let reply = extract_reply(&root, "OptionInfoReply")?;
        Ok(rate_normalizer::normalize_reply(reply))
    }

    async fn resolve_rate_ranges<C: HostConnect>(
        client: &C,
        code: &str,
        upstream: &NormalizedOption,
        start: NaiveDate,
        end: NaiveDate,
    ) -> (RateSource, Vec<RateRange>) {
        for source in FALLBACK_ORDER {
            let ranges = match source {
                RateSource::RailOverride => Self::rail_override_ranges(code),
                RateSource::DateRanges => upstream.date_ranges.clone(),
                RateSource::StayResults => upstream
                    .flat_rate
                    .iter()
                    .map(|flat| flat.dated(start, start))
                    .collect(),
                RateSource::ProductDetails => Self::product_details_ranges(client, code, start).await,
                RateSource::Placeholder => Vec::new(),
            };

            if !ranges.is_empty() {
                log::info!("{}: using {:?} rates", code, source);
                return (source, ranges);
            }
            log::debug!("{}: no {:?} rates", code, source);
        }

        log::info!("{}: no rates anywhere, using placeholder", code);
        (RateSource::Placeholder, vec![Self::placeholder(start, end)])
    }

    /// One single-day range per departure. Empty for non-rail codes.
    fn rail_override_ranges(code: &str) -> Vec<RateRange> {
        if !product_classifier::is_rail(code) {
            return Vec::new();
        }

        let entry = product_overrides::rail_override_for(code);
        entry
            .departure_dates()
            .into_iter()
            .map(|date| RateRange {
                date_from: date,
                date_to: date,
                currency: DEFAULT_CURRENCY.to_string(),
                single_rate: entry.single_rate,
                double_rate: entry.double_rate,
                twin_rate: entry.twin_rate,
                rate_name: format!("{} - Hardcoded", entry.name),
                applies_days_of_week: None,
                available: true,
            })
            .collect()
    }

    /// Priced rates from the product details lookup. Zero-priced
    /// placeholders on the product page do not count as rates here.
    async fn product_details_ranges<C: HostConnect>(client: &C, code: &str, start: NaiveDate) -> Vec<RateRange> {
        let details = match ProductService::get_product_details(client, code).await {
            Ok(details) => details,
            Err(e) => {
                log::warn!("{}: product details fallback failed: {}", code, e);
                return Vec::new();
            }
        };

        details
            .rates
            .into_iter()
            .filter(|rate| rate.single_rate > 0 || rate.double_rate > 0 || rate.twin_rate > 0)
            .map(|rate| RateRange {
                date_from: rate.date_from.unwrap_or(start),
                date_to: rate.date_to.unwrap_or(start),
                currency: rate.currency,
                single_rate: rate.single_rate,
                double_rate: if rate.double_rate > 0 { rate.double_rate } else { rate.twin_rate },
                twin_rate: if rate.twin_rate > 0 { rate.twin_rate } else { rate.double_rate },
                rate_name: if rate.rate_name.is_empty() {
                    DEFAULT_RATE_NAME.to_string()
                } else {
                    rate.rate_name
                },
                applies_days_of_week: None,
                available: true,
            })
            .collect()
    }

    fn placeholder(start: NaiveDate, end: NaiveDate) -> RateRange {
        RateRange {
            date_from: start,
            date_to: end,
            currency: DEFAULT_CURRENCY.to_string(),
            single_rate: 0,
            double_rate: 0,
            twin_rate: 0,
            rate_name: CONTACT_FOR_PRICING.to_string(),
            applies_days_of_week: None,
            available: true,
        }
    }
}
