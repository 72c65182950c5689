//! Turns an `OptionInfoReply` into rate ranges and the per-day `OptAvail` codes.
//!
//! Amounts are kept in the unit HostConnect sent them in. Whether that is
//! cents or dollars depends on the product and is settled only when a price
//! is displayed.

use chrono::NaiveDate;

use crate::models::pricing::{DaysOfWeek, RateRange};
use crate::services::tourplan::XmlNode;

pub const DEFAULT_CURRENCY: &str = "AUD";
pub const DEFAULT_RATE_NAME: &str = "Standard";
/// Largest amount accepted from upstream, in its own units. Anything above is
/// corrupt data, not a price.
pub const MAX_AMOUNT: u64 = 1_000_000_000_000;

/// An undated rate, e.g. the total from `OptStayResults`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRate {
    pub currency: String,
    pub single_rate: u64,
    pub double_rate: u64,
    pub twin_rate: u64,
    pub rate_name: String,
}

impl FlatRate {
    pub fn dated(&self, date_from: NaiveDate, date_to: NaiveDate) -> RateRange {
        RateRange {
            date_from,
            date_to,
            currency: self.currency.clone(),
            single_rate: self.single_rate,
            double_rate: self.double_rate,
            twin_rate: self.twin_rate,
            rate_name: self.rate_name.clone(),
            applies_days_of_week: None,
            available: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedOption {
    pub date_ranges: Vec<RateRange>,
    pub flat_rate: Option<FlatRate>,
    pub opt_avail: Option<Vec<String>>,
}

/// Normalizes the first `Option` of a reply. A reply without options is
/// "no data", not an error.
pub fn normalize_reply(reply: &XmlNode) -> NormalizedOption {
    match reply.children("Option").next() {
        Some(option) => normalize_option(option),
        None => {
            log::info!("OptionInfoReply contained no Option");
            NormalizedOption::default()
        }
    }
}

pub fn normalize_option(option: &XmlNode) -> NormalizedOption {
    NormalizedOption {
        date_ranges: date_range_rates(option),
        flat_rate: stay_result_rate(option),
        opt_avail: opt_avail_codes(option),
    }
}

/// HostConnect amounts are decimal strings; anything negative, unparseable or
/// above `MAX_AMOUNT` is absent.
pub fn parse_amount(raw: &str) -> Option<u64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    if value > MAX_AMOUNT as f64 {
        log::warn!("Ignoring out-of-range amount {:?}", raw);
        return None;
    }
    Some(value.round() as u64)
}

fn parse_date(node: &XmlNode, name: &str) -> Option<NaiveDate> {
    let raw = node.child_text(name)?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("Ignoring unparseable {} {:?}: {}", name, raw, e);
            None
        }
    }
}

fn amount(node: &XmlNode, name: &str) -> Option<u64> {
    node.child_text(name).and_then(parse_amount)
}

fn days_of_week(node: &XmlNode) -> Option<DaysOfWeek> {
    let applies = node.child("AppliesDaysOfWeek")?;
    let mut days = DaysOfWeek::default();
    for (name, flag) in &applies.attributes {
        days.set_from_attribute(name, flag);
    }
    Some(days)
}

/// One range per `RateSet` that carries at least one room rate.
pub fn date_range_rates(option: &XmlNode) -> Vec<RateRange> {
    let Some(ranges) = option.child("OptDateRanges") else {
        return Vec::new();
    };

    let mut rates = Vec::new();
    for range in ranges.children("OptDateRange") {
        let (Some(date_from), Some(date_to)) = (parse_date(range, "DateFrom"), parse_date(range, "DateTo")) else {
            continue;
        };
        if date_to < date_from {
            log::warn!("Skipping inverted date range {} .. {}", date_from, date_to);
            continue;
        }
        let currency = range.child_text("Currency").unwrap_or(DEFAULT_CURRENCY);

        let Some(rate_sets) = range.child("RateSets") else {
            continue;
        };
        for rate_set in rate_sets.children("RateSet") {
            let Some(room_rates) = rate_set.path(&["OptRate", "RoomRates"]) else {
                continue;
            };
            let single = amount(room_rates, "SingleRate");
            let double = amount(room_rates, "DoubleRate");
            let twin = amount(room_rates, "TwinRate");
            if single.is_none() && double.is_none() && twin.is_none() {
                continue;
            }

            rates.push(RateRange {
                date_from,
                date_to,
                currency: currency.to_string(),
                single_rate: single.unwrap_or(0),
                double_rate: double.or(twin).unwrap_or(0),
                twin_rate: twin.or(double).unwrap_or(0),
                rate_name: rate_set
                    .child_text("RateName")
                    .unwrap_or(DEFAULT_RATE_NAME)
                    .to_string(),
                applies_days_of_week: days_of_week(rate_set),
                available: true,
            });
        }
    }
    rates
}

/// The stay total from `OptStayResults`, treated as a twin-share room price.
pub fn stay_result_rate(option: &XmlNode) -> Option<FlatRate> {
    let stay = option.child("OptStayResults")?;
    let total = amount(stay, "AgentPrice").or_else(|| amount(stay, "TotalPrice"))?;

    Some(FlatRate {
        currency: stay.child_text("Currency").unwrap_or(DEFAULT_CURRENCY).to_string(),
        single_rate: total.div_ceil(2),
        double_rate: total,
        twin_rate: total,
        rate_name: stay
            .child_text("RateName")
            .unwrap_or(DEFAULT_RATE_NAME)
            .to_string(),
    })
}

/// Space separated codes, one per day from the request's first date.
pub fn opt_avail_codes(option: &XmlNode) -> Option<Vec<String>> {
    let codes: Vec<String> = option
        .child_text("OptAvail")?
        .split_whitespace()
        .map(str::to_string)
        .collect();
    (!codes.is_empty()).then_some(codes)
}
