//! Startup: configuration loading and `check-config`.

use anyhow::{Context, Result};

use apidoc_audit::AuditConfig;
use apidoc_client::{ApifoxClient, ApifoxConfig};
use apidoc_rules::{RuleConfig, RuleEngine};
use apidoc_tools::{check_apifox_config, ApiDocTools};

use crate::io::print_json;
use crate::{EXIT_CONFIG, EXIT_FAILURE, EXIT_OK};

/// Build the tool surface from environment-style variables. Any error here
/// is a startup configuration failure.
pub fn load_tools(lookup: impl Fn(&str) -> Option<String>) -> Result<ApiDocTools> {
    let config = ApifoxConfig::from_lookup(&lookup)?;
    let rules = RuleConfig::from_lookup(&lookup)?;
    let audit = AuditConfig::from_lookup(&lookup)?;
    tracing::debug!(?config, ?rules, ?audit, "configuration loaded");

    let client = ApifoxClient::new(config).context("failed to build HTTP client")?;
    Ok(ApiDocTools::new(client, RuleEngine::new(rules), audit))
}

/// `apidoc check-config`
pub async fn run_check_config() -> Result<u8> {
    let status = check_apifox_config(|var| std::env::var(var).ok()).await;
    print_json(&status)?;
    Ok(if status.is_ok() {
        EXIT_OK
    } else if status.reachable.is_none() {
        EXIT_CONFIG
    } else {
        EXIT_FAILURE
    })
}
