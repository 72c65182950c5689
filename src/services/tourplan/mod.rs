//! TourPlan HostConnect transport: request XML in, parsed reply tree out.
//!
//! Nothing in here interprets rates or availability; that lives in
//! `services::rate_normalizer` and the calendar services.

pub mod client;
pub mod xml_builder;
pub mod xml_parser;

use thiserror::Error;

pub use client::TourPlanClient;
pub use xml_builder::{OptionInfoRequest, RoomConfig};
pub use xml_parser::XmlNode;

#[derive(Debug, Error)]
pub enum TourPlanError {
    #[error("HostConnect request failed: {0}")]
    Transport(String),
    #[error("Failed to parse HostConnect response: {0}")]
    Parse(String),
    #[error("HostConnect error: {0}")]
    Upstream(String),
    #[error("Product {0} not found")]
    NotFound(String),
}

impl From<reqwest::Error> for TourPlanError {
    fn from(err: reqwest::Error) -> Self {
        TourPlanError::Transport(err.to_string())
    }
}

/// One request/response exchange with HostConnect.
///
/// Implementations send the XML body and return the parsed document root.
pub trait HostConnect {
    async fn send(&self, request_xml: String) -> Result<XmlNode, TourPlanError>;

    /// Agent credentials embedded in every request body.
    fn credentials(&self) -> (&str, &str);
}
