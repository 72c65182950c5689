use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::product::ProductType;

/// Weekdays a rate applies to, as sent in HostConnect `AppliesDaysOfWeek`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysOfWeek {
    pub mon: bool,
    pub tue: bool,
    pub wed: bool,
    pub thu: bool,
    pub fri: bool,
    pub sat: bool,
    pub sun: bool,
}

impl DaysOfWeek {
    pub fn applies_to(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    /// Sets a day from a HostConnect attribute name. Returns false for unknown names.
    pub fn set_from_attribute(&mut self, name: &str, flag: &str) -> bool {
        let enabled = flag.eq_ignore_ascii_case("Y");
        let slot = match name {
            "Mon" => &mut self.mon,
            "Tue" | "Tues" => &mut self.tue,
            "Wed" | "Weds" => &mut self.wed,
            "Thu" | "Thur" | "Thurs" => &mut self.thu,
            "Fri" => &mut self.fri,
            "Sat" => &mut self.sat,
            "Sun" => &mut self.sun,
            _ => return false,
        };
        *slot = enabled;
        true
    }
}

/// A contiguous, inclusive span of dates sharing one rate.
///
/// Rates are in whatever unit upstream used for the product (cents for
/// almost everything, whole dollars for a couple of lodges); see
/// `product_overrides::currency_unit_for`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRange {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub currency: String,
    pub single_rate: u64,
    pub double_rate: u64,
    pub twin_rate: u64,
    pub rate_name: String,
    #[serde(default)]
    pub applies_days_of_week: Option<DaysOfWeek>,
    pub available: bool,
}

impl RateRange {
    pub fn snapshot(&self) -> RateSnapshot {
        RateSnapshot {
            currency: self.currency.clone(),
            single_rate: self.single_rate,
            double_rate: self.double_rate,
            twin_rate: self.twin_rate,
            rate_name: self.rate_name.clone(),
            applies_days_of_week: self.applies_days_of_week,
        }
    }
}

/// The rate fields copied onto every calendar day a range covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub currency: String,
    pub single_rate: u64,
    pub double_rate: u64,
    pub twin_rate: u64,
    pub rate_name: String,
    pub applies_days_of_week: Option<DaysOfWeek>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u32,
    pub available: bool,
    pub valid_day: bool,
    pub display_price: String,
    #[serde(flatten)]
    pub rate: Option<RateSnapshot>,
}

impl CalendarDay {
    pub fn unpriced(date: NaiveDate) -> Self {
        Self {
            date,
            day_of_week: date.weekday().num_days_from_sunday(),
            available: false,
            valid_day: false,
            display_price: "N/A".to_string(),
            rate: None,
        }
    }
}

/// Which provider in the fallback chain produced the rate ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RateSource {
    RailOverride,
    DateRanges,
    StayResults,
    ProductDetails,
    Placeholder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Travelers {
    pub adults: u32,
    pub children: u32,
    pub room_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingCalendar {
    pub product_code: String,
    pub product_type: ProductType,
    pub source: RateSource,
    pub date_range: DateRangeParams,
    pub travelers: Travelers,
    pub calendar: Vec<CalendarDay>,
    pub date_ranges: Vec<RateRange>,
}

/// Envelope shared by every TourPlan endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    pub fn failure(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            details: Some(details.into()),
        }
    }
}
