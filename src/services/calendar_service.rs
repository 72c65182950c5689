//! Expands rate ranges into one `CalendarDay` per bookable (or shown) date.
//!
//! Two shapes of output:
//! - rail: only the dates present in the rate ranges, since departures are
//!   sparse, individually listed dates;
//! - everything else: every date from start to end inclusive, with
//!   `valid_day` decided per product type.
//!
//! Pure and deterministic: same input, same output.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::pricing::{CalendarDay, RateRange, RateSnapshot};
use crate::services::pricing_service::PricingService;
use crate::services::product_classifier;

/// One HostConnect `OptAvail` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityCode {
    /// -1
    NotAvailable,
    /// -2
    FreeSell,
    /// -3
    OnRequest,
    /// Units left; 0 is possible and means sold out.
    Units(u32),
    Unrecognized,
}

impl AvailabilityCode {
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "-1" => AvailabilityCode::NotAvailable,
            "-2" => AvailabilityCode::FreeSell,
            "-3" => AvailabilityCode::OnRequest,
            other => other
                .parse::<u32>()
                .map(AvailabilityCode::Units)
                .unwrap_or(AvailabilityCode::Unrecognized),
        }
    }

    /// Group tours only sell days with confirmed units; "on request" is not enough.
    pub fn is_valid_for(&self, group_tour: bool) -> bool {
        if group_tour {
            matches!(self, AvailabilityCode::Units(units) if *units > 0)
        } else {
            *self != AvailabilityCode::NotAvailable
        }
    }
}

pub struct CalendarRequest<'a> {
    pub rate_ranges: &'a [RateRange],
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub product_code: &'a str,
    pub is_accommodation: bool,
    pub opt_avail: Option<&'a [String]>,
    /// The date `opt_avail[0]` refers to.
    pub opt_avail_anchor: NaiveDate,
}

#[derive(Debug, Clone)]
struct DayRate {
    rate: RateSnapshot,
    available: bool,
}

/// Calendar-day distance from `anchor` to `day`.
///
/// Dates carry no time of day, so a DST change between the two cannot skew
/// the count the way a millisecond difference divided by 24h can.
pub fn days_since(anchor: NaiveDate, day: NaiveDate) -> i64 {
    day.signed_duration_since(anchor).num_days()
}

fn inclusive_days(from: NaiveDate, to: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    from.iter_days().take_while(move |day| *day <= to)
}

/// Date -> rate, later ranges overwriting earlier ones where they overlap.
fn day_rate_map(rate_ranges: &[RateRange]) -> BTreeMap<NaiveDate, DayRate> {
    let mut map = BTreeMap::new();
    for range in rate_ranges {
        for day in inclusive_days(range.date_from, range.date_to) {
            map.insert(
                day,
                DayRate {
                    rate: range.snapshot(),
                    available: range.available,
                },
            );
        }
    }
    map
}

fn priced_day(date: NaiveDate, entry: &DayRate, valid_day: bool, product_code: &str) -> CalendarDay {
    CalendarDay {
        date,
        day_of_week: date.weekday().num_days_from_sunday(),
        available: entry.available,
        valid_day,
        display_price: PricingService::format_display_price(product_code, &entry.rate),
        rate: Some(entry.rate.clone()),
    }
}

pub fn materialize(request: &CalendarRequest) -> Vec<CalendarDay> {
    let day_rates = day_rate_map(request.rate_ranges);

    if product_classifier::is_rail(request.product_code) {
        log::debug!(
            "Rail product {}: emitting {} departure dates",
            request.product_code,
            day_rates.len()
        );
        return day_rates
            .iter()
            .map(|(date, entry)| priced_day(*date, entry, entry.available, request.product_code))
            .collect();
    }

    if request.end < request.start {
        return Vec::new();
    }

    let group_tour = product_classifier::is_group_tour(request.product_code);

    inclusive_days(request.start, request.end)
        .map(|date| match day_rates.get(&date) {
            Some(entry) => {
                let valid_day = day_is_valid(request, date, entry, group_tour) && entry.available;
                priced_day(date, entry, valid_day, request.product_code)
            }
            None => CalendarDay::unpriced(date),
        })
        .collect()
}

fn day_is_valid(request: &CalendarRequest, date: NaiveDate, entry: &DayRate, group_tour: bool) -> bool {
    if request.is_accommodation {
        return true;
    }

    if let Some(codes) = request.opt_avail {
        let index = days_since(request.opt_avail_anchor, date);
        let code = usize::try_from(index).ok().and_then(|i| codes.get(i));
        return match code {
            Some(code) => {
                let parsed = AvailabilityCode::parse(code);
                let valid = parsed.is_valid_for(group_tour);
                log::debug!(
                    "{} {}: OptAvail[{}] = {} ({:?}) -> valid {}",
                    request.product_code,
                    date,
                    index,
                    code,
                    parsed,
                    valid
                );
                valid
            }
            None => {
                log::warn!(
                    "{} {}: OptAvail index {} outside 0..{}, treating day as unavailable",
                    request.product_code,
                    date,
                    index,
                    codes.len()
                );
                false
            }
        };
    }

    match &entry.rate.applies_days_of_week {
        Some(days) => days.applies_to(date.weekday()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pricing::DaysOfWeek;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(from: NaiveDate, to: NaiveDate, twin_rate: u64) -> RateRange {
        RateRange {
            date_from: from,
            date_to: to,
            currency: "AUD".to_string(),
            single_rate: 0,
            double_rate: twin_rate,
            twin_rate,
            rate_name: "Standard".to_string(),
            applies_days_of_week: None,
            available: true,
        }
    }

    fn codes(raw: &str) -> Vec<String> {
        raw.split_whitespace().map(str::to_string).collect()
    }

    fn request<'a>(
        ranges: &'a [RateRange],
        start: NaiveDate,
        end: NaiveDate,
        code: &'a str,
        opt_avail: Option<&'a [String]>,
    ) -> CalendarRequest<'a> {
        CalendarRequest {
            rate_ranges: ranges,
            start,
            end,
            product_code: code,
            is_accommodation: false,
            opt_avail,
            opt_avail_anchor: start,
        }
    }

    #[test]
    fn test_non_rail_covers_every_day_in_order() {
        let ranges = vec![range(date(2025, 10, 3), date(2025, 10, 5), 200_000)];
        let calendar = materialize(&request(
            &ranges,
            date(2025, 9, 30),
            date(2025, 10, 7),
            "BBKCRCHO018TIACP2",
            None,
        ));

        assert_eq!(calendar.len(), 8);
        assert!(calendar.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(calendar[0].date, date(2025, 9, 30));
        assert_eq!(calendar[7].date, date(2025, 10, 7));

        let unpriced = &calendar[0];
        assert!(!unpriced.available && !unpriced.valid_day);
        assert_eq!(unpriced.display_price, "N/A");

        let priced = &calendar[3];
        assert_eq!(priced.date, date(2025, 10, 3));
        assert!(priced.valid_day);
        assert_eq!(priced.display_price, "AUD $1,000");
        assert_eq!(priced.day_of_week, 5);
    }

    #[test]
    fn test_later_ranges_overwrite_earlier_ones() {
        let ranges = vec![
            range(date(2025, 10, 1), date(2025, 10, 10), 200_000),
            range(date(2025, 10, 5), date(2025, 10, 6), 400_000),
        ];
        let calendar = materialize(&request(&ranges, date(2025, 10, 4), date(2025, 10, 7), "X", None));

        let prices: Vec<&str> = calendar.iter().map(|d| d.display_price.as_str()).collect();
        assert_eq!(prices, vec!["AUD $1,000", "AUD $2,000", "AUD $2,000", "AUD $1,000"]);
    }

    #[test]
    fn test_rail_emits_only_mapped_dates() {
        let ranges = vec![
            range(date(2025, 10, 6), date(2025, 10, 6), 497_800),
            range(date(2025, 12, 20), date(2025, 12, 20), 497_800),
        ];
        let calendar = materialize(&request(
            &ranges,
            date(2025, 10, 1),
            date(2025, 10, 31),
            "CPTRLROV001CTPPUL",
            None,
        ));

        let dates: Vec<NaiveDate> = calendar.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(2025, 10, 6), date(2025, 12, 20)]);
        assert!(calendar.iter().all(|d| d.valid_day && d.available));
        assert_eq!(calendar[0].display_price, "AUD $2,489");
    }

    #[test]
    fn test_day_index_across_dst_change() {
        assert_eq!(days_since(date(2025, 9, 28), date(2025, 10, 6)), 8);
        assert_eq!(days_since(date(2025, 3, 30), date(2025, 4, 7)), 8);
        assert_eq!(days_since(date(2025, 10, 6), date(2025, 9, 28)), -8);

        // Only index 8 (2025-10-06) is open.
        let avail = codes("-1 -1 -1 -1 -1 -1 -1 -1 5 -1 -1");
        let ranges = vec![range(date(2025, 9, 28), date(2025, 10, 8), 200_000)];
        let calendar = materialize(&request(
            &ranges,
            date(2025, 9, 28),
            date(2025, 10, 8),
            "BBKCRTVT001ZAM3NS",
            Some(&avail),
        ));

        let valid: Vec<NaiveDate> = calendar.iter().filter(|d| d.valid_day).map(|d| d.date).collect();
        assert_eq!(valid, vec![date(2025, 10, 6)]);
    }

    #[test]
    fn test_on_request_is_invalid_for_group_tours_only() {
        let avail = codes("-3 -2 3 0");
        let ranges = vec![range(date(2025, 11, 1), date(2025, 11, 4), 200_000)];

        let group = materialize(&request(&ranges, date(2025, 11, 1), date(2025, 11, 4), "NBOGTARP001THRKE3", Some(&avail)));
        let valid: Vec<bool> = group.iter().map(|d| d.valid_day).collect();
        assert_eq!(valid, vec![false, false, true, false]);

        let cruise = materialize(&request(&ranges, date(2025, 11, 1), date(2025, 11, 4), "BBKCRCHO018TIACP2", Some(&avail)));
        let valid: Vec<bool> = cruise.iter().map(|d| d.valid_day).collect();
        assert_eq!(valid, vec![true, true, true, true]);
    }

    #[test]
    fn test_opt_avail_index_out_of_range_is_invalid() {
        let avail = codes("4 4");
        let ranges = vec![range(date(2025, 11, 1), date(2025, 11, 4), 200_000)];
        let mut req = request(&ranges, date(2025, 10, 31), date(2025, 11, 4), "BBKCRCHO018TIACP2", Some(&avail));
        req.opt_avail_anchor = date(2025, 11, 2);

        let calendar = materialize(&req);
        let valid: Vec<bool> = calendar.iter().map(|d| d.valid_day).collect();
        // 10-31 unpriced, 11-01 before the anchor, 11-02/03 covered, 11-04 past the end
        assert_eq!(valid, vec![false, false, true, true, false]);
    }

    #[test]
    fn test_weekday_fallback_without_opt_avail() {
        let mut fridays = range(date(2025, 10, 1), date(2025, 10, 14), 200_000);
        fridays.applies_days_of_week = Some(DaysOfWeek {
            fri: true,
            ..Default::default()
        });
        let ranges = vec![fridays];
        let calendar = materialize(&request(&ranges, date(2025, 10, 1), date(2025, 10, 14), "X", None));

        let valid: Vec<NaiveDate> = calendar.iter().filter(|d| d.valid_day).map(|d| d.date).collect();
        assert_eq!(valid, vec![date(2025, 10, 3), date(2025, 10, 10)]);
    }

    #[test]
    fn test_accommodation_ignores_opt_avail_and_weekdays() {
        let mut closed = range(date(2025, 10, 3), date(2025, 10, 4), 2_000);
        closed.available = false;
        let mut sundays = range(date(2025, 10, 1), date(2025, 10, 2), 2_000);
        sundays.applies_days_of_week = Some(DaysOfWeek {
            sun: true,
            ..Default::default()
        });
        let ranges = vec![sundays, closed];
        let avail = codes("-1 -1 -1 -1");
        let mut req = request(&ranges, date(2025, 10, 1), date(2025, 10, 4), "GKPSPSABBLDSABBLS", Some(&avail));
        req.is_accommodation = true;

        let calendar = materialize(&req);
        assert!(calendar.iter().all(|d| d.valid_day == d.available));
        let valid: Vec<bool> = calendar.iter().map(|d| d.valid_day).collect();
        assert_eq!(valid, vec![true, true, false, false]);
        assert_eq!(calendar[0].display_price, "AUD $1,000");
    }

    #[test]
    fn test_materialize_is_deterministic() {
        let avail = codes("1 -1 -3 2 -2");
        let ranges = vec![
            range(date(2025, 10, 1), date(2025, 10, 3), 100_000),
            range(date(2025, 10, 3), date(2025, 10, 5), 300_000),
        ];
        let req = request(&ranges, date(2025, 10, 1), date(2025, 10, 6), "NBOGTARP001CKSM", Some(&avail));

        let first = serde_json::to_string(&materialize(&req)).unwrap();
        let second = serde_json::to_string(&materialize(&req)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inverted_request_range_is_empty() {
        let ranges = vec![range(date(2025, 10, 1), date(2025, 10, 3), 100_000)];
        assert!(materialize(&request(&ranges, date(2025, 10, 3), date(2025, 10, 1), "X", None)).is_empty());
    }

    #[test]
    fn test_availability_codes() {
        assert_eq!(AvailabilityCode::parse("-1"), AvailabilityCode::NotAvailable);
        assert_eq!(AvailabilityCode::parse("-2"), AvailabilityCode::FreeSell);
        assert_eq!(AvailabilityCode::parse("-3"), AvailabilityCode::OnRequest);
        assert_eq!(AvailabilityCode::parse("12"), AvailabilityCode::Units(12));
        assert_eq!(AvailabilityCode::parse("?"), AvailabilityCode::Unrecognized);
        assert!(!AvailabilityCode::Units(0).is_valid_for(true));
        assert!(AvailabilityCode::Units(0).is_valid_for(false));
    }
}
