//! Per-product corrections for upstream data that is known to be wrong.
//!
//! Two tables, both keyed by exact product code:
//! - `CURRENCY_UNITS`: products whose HostConnect rates are already whole
//!   dollars. Everything else is in cents.
//! - `RAIL_OVERRIDES`: Rovos Rail departures and rates. HostConnect does not
//!   return usable departure dates for rail, so these replace upstream data
//!   entirely.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyUnit {
    Cents,
    Dollars,
}

const CURRENCY_UNITS: &[(&str, CurrencyUnit)] = &[
    ("GKPSPSABBLDSABBLS", CurrencyUnit::Dollars), // Sabi Sabi Bush Lodge
    ("GKPSPSAV002SAVLHM", CurrencyUnit::Dollars), // Savanna Lodge
];

pub fn currency_unit_for(product_code: &str) -> CurrencyUnit {
    CURRENCY_UNITS
        .iter()
        .find(|(code, _)| *code == product_code)
        .map(|(_, unit)| *unit)
        .unwrap_or(CurrencyUnit::Cents)
}

/// Fixed departures and cents-denominated rates for one rail route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailOverride {
    pub name: &'static str,
    pub dates: &'static [&'static str],
    pub single_rate: u64,
    pub double_rate: u64,
    pub twin_rate: u64,
}

impl RailOverride {
    /// Departure dates in order. Malformed entries are skipped with a warning.
    pub fn departure_dates(&self) -> Vec<NaiveDate> {
        self.dates
            .iter()
            .filter_map(|raw| match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(e) => {
                    log::warn!("Skipping bad departure date {:?} for {}: {}", raw, self.name, e);
                    None
                }
            })
            .collect()
    }
}

const CAPE_TOWN_TO_PRETORIA: &[&str] = &[
    "2025-08-04", "2025-08-11", "2025-08-26",
    "2025-09-08", "2025-09-12", "2025-09-15", "2025-09-29",
    "2025-10-06", "2025-10-10", "2025-10-27", "2025-10-28",
    "2025-11-03", "2025-11-10", "2025-11-25",
    "2025-12-09", "2025-12-20", "2025-12-27",
    "2026-01-13", "2026-01-20", "2026-01-27",
    "2026-02-10", "2026-02-14", "2026-02-23",
    "2026-03-10", "2026-03-13", "2026-03-24",
    "2026-04-03", "2026-04-07", "2026-04-14", "2026-04-21",
    "2026-05-05", "2026-05-08", "2026-05-19",
    "2026-06-02", "2026-06-16",
    "2026-07-14", "2026-07-28",
    "2026-08-08", "2026-08-11", "2026-08-25",
    "2026-09-08", "2026-09-22", "2026-09-25",
];

const PRETORIA_TO_CAPE_TOWN: &[&str] = &[
    "2025-08-01", "2025-08-08", "2025-08-22",
    "2025-09-05", "2025-09-19", "2025-09-26",
    "2025-10-03", "2025-10-07", "2025-10-24", "2025-10-31",
    "2025-11-07", "2025-11-20", "2025-11-21",
    "2025-12-05", "2025-12-23",
    "2026-01-05", "2026-01-09", "2026-01-16", "2026-01-23",
    "2026-02-06", "2026-02-18", "2026-02-20",
    "2026-03-06", "2026-03-20",
    "2026-04-03", "2026-04-17",
    "2026-05-01", "2026-05-15", "2026-05-29",
    "2026-06-12", "2026-06-26",
    "2026-07-10", "2026-07-24",
    "2026-08-07", "2026-08-14", "2026-08-21",
    "2026-09-04", "2026-09-18",
];

const PULLMAN: (u64, u64) = (331_900, 497_800);
const ROYAL: (u64, u64) = (637_200, 955_800);
const DELUXE: (u64, u64) = (477_900, 716_900);

const fn route(name: &'static str, dates: &'static [&'static str], rates: (u64, u64)) -> RailOverride {
    RailOverride {
        name,
        dates,
        single_rate: rates.0,
        double_rate: rates.1,
        twin_rate: rates.1,
    }
}

const RAIL_OVERRIDES: &[(&str, RailOverride)] = &[
    ("CPTRLROV001CTPPUL", route("Cape Town to Pretoria (Pullman)", CAPE_TOWN_TO_PRETORIA, PULLMAN)),
    ("CPTRLROV001CTPRRO", route("Cape Town to Pretoria (Royal)", CAPE_TOWN_TO_PRETORIA, ROYAL)),
    ("CPTRLROV001RRCTPR", route("Cape Town to Pretoria (RRCTPR)", CAPE_TOWN_TO_PRETORIA, DELUXE)),
    ("PRYRLROV001PRCPPM", route("Pretoria to Cape Town (Pullman)", PRETORIA_TO_CAPE_TOWN, PULLMAN)),
    ("PRYRLROV001PRCPRY", route("Pretoria to Cape Town (Royal)", PRETORIA_TO_CAPE_TOWN, ROYAL)),
    ("PRYRLROV001ROV004", route("Pretoria to Cape Town (ROV004)", PRETORIA_TO_CAPE_TOWN, DELUXE)),
];

/// Used for rail codes missing from the table: Cape Town departures, no price.
const UNKNOWN_RAIL: RailOverride = route("Unknown Rail Product", CAPE_TOWN_TO_PRETORIA, (0, 0));

/// Override for a rail product. Unknown codes get the zero-priced fallback.
pub fn rail_override_for(product_code: &str) -> RailOverride {
    match RAIL_OVERRIDES.iter().find(|(code, _)| *code == product_code) {
        Some((_, entry)) => *entry,
        None => {
            log::info!("No rail override for {}, using zero-priced default dates", product_code);
            UNKNOWN_RAIL
        }
    }
}
