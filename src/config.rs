//! Runtime configuration for the TourPlan HostConnect integration.
//!
//! Values come from the environment (a `.env` file is loaded by `main` in
//! debug builds). Each setting accepts the two variable names the website
//! has used over time; the first one found wins.

use std::{env, time::Duration};

use thiserror::Error;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in .env or environment")]
    Missing(&'static str),
    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct TourPlanConfig {
    pub endpoint: String,
    pub agent_id: String,
    pub password: String,
    pub timeout: Duration,
}

fn first_set(names: &[&'static str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

fn require(names: &[&'static str]) -> Result<String, ConfigError> {
    first_set(names).ok_or(ConfigError::Missing(names[0]))
}

impl TourPlanConfig {
    /// Required: `TOURPLAN_API_URL`, `TOURPLAN_AGENTID`, `TOURPLAN_AGENTPASSWORD`
    /// (or their `TOURPLAN_ENDPOINT`, `TOURPLAN_AGENT_ID`, `TOURPLAN_PASSWORD` aliases).
    ///
    /// Optional: `TOURPLAN_TIMEOUT_SECS` (default 30).
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = require(&["TOURPLAN_API_URL", "TOURPLAN_ENDPOINT"])?;
        let agent_id = require(&["TOURPLAN_AGENTID", "TOURPLAN_AGENT_ID"])?;
        let password = require(&["TOURPLAN_AGENTPASSWORD", "TOURPLAN_PASSWORD"])?;

        let timeout_secs = match env::var("TOURPLAN_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "TOURPLAN_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            endpoint,
            agent_id,
            password,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Agent id with the middle masked, for health output and logs.
    pub fn masked_agent_id(&self) -> String {
        let id = &self.agent_id;
        if id.chars().count() > 4 {
            let head: String = id.chars().take(2).collect();
            let tail: String = id.chars().skip(id.chars().count() - 2).collect();
            format!("{}***{}", head, tail)
        } else {
            "***".to_string()
        }
    }

    pub fn log_config(&self) {
        log::info!("TourPlan configuration loaded:");
        log::info!("  endpoint : {}", self.endpoint);
        log::info!("  agent id : {}", self.masked_agent_id());
        log::info!("  timeout  : {}s", self.timeout.as_secs());
    }
}
