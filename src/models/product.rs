use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Product taxonomy. HostConnect has no reliable type field, so this is
/// always derived from the product code (see `product_classifier`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductType {
    Rail,
    Cruise,
    Accommodation,
    GroupTour,
    Other,
}

impl ProductType {
    pub fn as_str(&self) -> &str {
        match self {
            ProductType::Rail => "rail",
            ProductType::Cruise => "cruise",
            ProductType::Accommodation => "accommodation",
            ProductType::GroupTour => "groupTour",
            ProductType::Other => "other",
        }
    }
}

/// A rate as listed on the product details page. Dates are optional because
/// flat rates carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRate {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub currency: String,
    pub single_rate: u64,
    pub double_rate: u64,
    pub twin_rate: u64,
    pub rate_name: String,
    pub display_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductNote {
    pub category: String,
    pub text: String,
}

/// Notes mapped onto the sections the product page renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub code: String,
    pub name: String,
    pub description: String,
    pub supplier_name: String,
    pub location: String,
    pub periods: u32,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub product_type: ProductType,
    pub rates: Vec<ProductRate>,
    pub notes: Vec<ProductNote>,
    pub content: ProductContent,
}
