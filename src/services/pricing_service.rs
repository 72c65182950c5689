use crate::models::pricing::RateSnapshot;
use crate::services::product_overrides::{currency_unit_for, CurrencyUnit};

pub const PRICE_ON_APPLICATION: &str = "POA";

pub struct PricingService;

impl PricingService {
    /// "From" price shown on a calendar day, per person.
    pub fn format_display_price(product_code: &str, rate: &RateSnapshot) -> String {
        Self::display_price(product_code, &rate.currency, rate.single_rate, rate.twin_rate)
    }

    /// Twin rates are for the room, so they are halved to a per-person price.
    /// The twin rate wins when both are set. Returns "POA" with no usable rate.
    pub fn display_price(product_code: &str, currency: &str, single_rate: u64, twin_rate: u64) -> String {
        let unit = currency_unit_for(product_code);
        let dollars = if twin_rate > 0 {
            Self::per_person_twin(twin_rate, unit)
        } else if single_rate > 0 {
            Self::whole_dollars(single_rate, unit)
        } else {
            return PRICE_ON_APPLICATION.to_string();
        };

        format!("{} ${}", currency, group_thousands(dollars))
    }

    /// Rounds half up, like the booking site always has.
    fn per_person_twin(twin_rate: u64, unit: CurrencyUnit) -> u64 {
        match unit {
            CurrencyUnit::Dollars => twin_rate.div_ceil(2),
            CurrencyUnit::Cents => twin_rate.saturating_add(100) / 200,
        }
    }

    fn whole_dollars(rate: u64, unit: CurrencyUnit) -> u64 {
        match unit {
            CurrencyUnit::Dollars => rate,
            CurrencyUnit::Cents => rate.saturating_add(50) / 100,
        }
    }
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
