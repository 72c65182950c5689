//! Product type detection.
//!
//! HostConnect carries no usable product-type field, so the type is inferred
//! from the product code. Every signal lives in `CLASSIFICATION_TABLE`; rules
//! are tried top to bottom and the first match wins, which gives the
//! precedence rail > accommodation > cruise > group tour > other.
//!
//! The referer hook is separate: a request coming from the cruise listing
//! pages turns a product that is neither rail, accommodation nor cruise into
//! a cruise. Group tour is a materializer rule, so it yields to the referer
//! too.

use crate::models::product::ProductType;

#[derive(Debug, Clone, Copy)]
enum Signal {
    Exact(&'static str),
    Contains(&'static str),
    ContainsIgnoreCase(&'static str),
}

impl Signal {
    fn matches(&self, code: &str) -> bool {
        match self {
            Signal::Exact(marker) => code == *marker,
            Signal::Contains(marker) => code.contains(marker),
            Signal::ContainsIgnoreCase(marker) => code.to_ascii_lowercase().contains(marker),
        }
    }
}

struct Rule {
    product_type: ProductType,
    signals: &'static [Signal],
}

const RAIL_SIGNALS: &[Signal] = &[
    Signal::Contains("RLROV"), // Rovos Rail, e.g. CPTRLROV001CTPPUL
    Signal::ContainsIgnoreCase("rail"),
    Signal::Contains("BLUE"), // Blue Train
    Signal::Contains("PREMIER"), // Premier Classe
];

const ACCOMMODATION_SIGNALS: &[Signal] = &[
    Signal::Exact("GKPSPSABBLDSABBLS"), // Sabi Sabi Bush Lodge
    Signal::Exact("GKPSPSAV002SAVLHM"), // Savanna Lodge
    Signal::Contains("ACCOMMODATION"),
    Signal::Contains("LODGE"),
    Signal::Contains("HOTEL"),
];

const CRUISE_SIGNALS: &[Signal] = &[
    Signal::Contains("CRCHO"), // Chobe
    Signal::Contains("CRTVT"), // Victoria Falls / Zambezi
    Signal::ContainsIgnoreCase("cruise"),
];

const GROUP_TOUR_SIGNALS: &[Signal] = &[
    Signal::Contains("NBOGTARP"),
    Signal::Contains("GROUPTOUR"),
];

const CLASSIFICATION_TABLE: &[Rule] = &[
    Rule {
        product_type: ProductType::Rail,
        signals: RAIL_SIGNALS,
    },
    Rule {
        product_type: ProductType::Accommodation,
        signals: ACCOMMODATION_SIGNALS,
    },
    Rule {
        product_type: ProductType::Cruise,
        signals: CRUISE_SIGNALS,
    },
    Rule {
        product_type: ProductType::GroupTour,
        signals: GROUP_TOUR_SIGNALS,
    },
];

fn any_signal(signals: &[Signal], code: &str) -> bool {
    signals.iter().any(|signal| signal.matches(code))
}

/// Classification from the product code alone.
pub fn classify_code(product_code: &str) -> ProductType {
    CLASSIFICATION_TABLE
        .iter()
        .find(|rule| any_signal(rule.signals, product_code))
        .map(|rule| rule.product_type)
        .unwrap_or(ProductType::Other)
}

/// Classification including the referer override.
pub fn classify(product_code: &str, referer: Option<&str>) -> ProductType {
    let by_code = classify_code(product_code);
    let overridable = matches!(by_code, ProductType::Other | ProductType::GroupTour);
    if overridable && referer.is_some_and(is_cruise_page) {
        log::debug!("{} classified as cruise from referer", product_code);
        return ProductType::Cruise;
    }
    by_code
}

pub fn is_rail(product_code: &str) -> bool {
    any_signal(RAIL_SIGNALS, product_code)
}

pub fn is_accommodation(product_code: &str) -> bool {
    any_signal(ACCOMMODATION_SIGNALS, product_code)
}

pub fn is_group_tour(product_code: &str) -> bool {
    any_signal(GROUP_TOUR_SIGNALS, product_code)
}

/// True for `/cruise...` listing pages. Accepts absolute or relative referers.
fn is_cruise_page(referer: &str) -> bool {
    match url::Url::parse(referer) {
        Ok(url) => url.path().contains("/cruise"),
        Err(_) => referer.contains("/cruise"),
    }
}
