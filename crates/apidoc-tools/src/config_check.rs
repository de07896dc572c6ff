//! `check_apifox_config`: credential presence and reachability.
//!
//! Runs without a constructed [`crate::ApiDocTools`] so it can report on a
//! configuration that does not load.

use serde::Serialize;

use apidoc_client::{ApifoxClient, ApifoxConfig};

/// Outcome of a configuration check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub token_present: bool,
    /// Masked token, only when the configuration loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_masked: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// `None` when no probe was attempted.
    pub reachable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ConfigStatus {
    /// Loaded and reachable.
    pub fn is_ok(&self) -> bool {
        self.reachable == Some(true)
    }
}

const PERMISSION_HINT: &str =
    "the token was rejected for this project; check that it has access to APIFOX_PROJECT_ID";

/// Load the configuration through `lookup` and probe the service with a
/// one-item listing.
pub async fn check_apifox_config(lookup: impl Fn(&str) -> Option<String>) -> ConfigStatus {
    let present = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
    let mut status = ConfigStatus {
        token_present: present("APIFOX_TOKEN").is_some(),
        token_masked: None,
        project_id: present("APIFOX_PROJECT_ID").map(|p| p.trim().to_string()),
        api_version: None,
        base_url: None,
        reachable: None,
        error: None,
        hint: None,
    };

    let config = match ApifoxConfig::from_lookup(&lookup) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "configuration incomplete");
            status.error = Some(e.to_string());
            return status;
        }
    };
    status.token_masked = Some(config.masked_token());
    status.api_version = Some(config.api_version.clone());
    status.base_url = Some(config.base_url.to_string());

    let client = match ApifoxClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            status.error = Some(e.to_string());
            return status;
        }
    };

    match client.probe().await {
        Ok(()) => status.reachable = Some(true),
        Err(e) => {
            tracing::warn!(error = %e, "reachability probe failed");
            if e.status() == Some(403) {
                status.hint = Some(PERMISSION_HINT.to_string());
            }
            status.reachable = Some(false);
            status.error = Some(e.to_string());
        }
    }
    status
}
