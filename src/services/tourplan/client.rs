use reqwest::Client as ReqwestClient;

use super::{xml_parser, HostConnect, TourPlanError, XmlNode};
use crate::config::TourPlanConfig;

/// HostConnect over HTTPS. One POST per request, no retries.
#[derive(Clone)]
pub struct TourPlanClient {
    http_client: ReqwestClient,
    config: TourPlanConfig,
}

impl TourPlanClient {
    pub fn new(config: TourPlanConfig) -> Result<Self, TourPlanError> {
        let http_client = ReqwestClient::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

impl HostConnect for TourPlanClient {
    async fn send(&self, request_xml: String) -> Result<XmlNode, TourPlanError> {
        log::debug!("HostConnect request ({} bytes)", request_xml.len());

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("Accept", "text/xml")
            .body(request_xml)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("HostConnect returned HTTP {}", status);
            return Err(TourPlanError::Transport(format!("HTTP {}", status)));
        }

        let body = response.text().await?;
        log::debug!("HostConnect response ({} bytes)", body.len());

        xml_parser::parse_response(&body)
    }

    fn credentials(&self) -> (&str, &str) {
        (&self.config.agent_id, &self.config.password)
    }
}
