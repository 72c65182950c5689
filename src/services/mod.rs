pub mod calendar_service;
pub mod pricing_calendar_service;
pub mod pricing_service;
pub mod product_classifier;
pub mod product_overrides;
pub mod product_service;
pub mod rate_normalizer;
pub mod tourplan;
