//! Apifox client configuration.
//!
//! Defaults point to the public Apifox open API. Override via environment
//! variables or explicit construction for testing.

use apidoc_core::ProjectId;
use url::Url;
use zeroize::Zeroizing;

/// Default service root.
pub const DEFAULT_BASE_URL: &str = "https://api.apifox.com";

/// Default value of the `X-Apifox-Api-Version` header.
pub const DEFAULT_API_VERSION: &str = "2024-03-28";

/// Default `locale` query parameter.
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// Configuration for connecting to the documentation service.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ApifoxConfig {
    /// Service root. Default: <https://api.apifox.com>
    pub base_url: Url,
    /// Project every call is scoped to.
    pub project_id: ProjectId,
    /// Bearer token for API authentication, zeroed on drop.
    pub api_token: Zeroizing<String>,
    /// Sent as `X-Apifox-Api-Version`.
    pub api_version: String,
    /// Sent as the `locale` query parameter.
    pub locale: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ApifoxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApifoxConfig")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("api_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("locale", &self.locale)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ApifoxConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `APIFOX_TOKEN` (required)
    /// - `APIFOX_PROJECT_ID` (required)
    /// - `APIFOX_BASE_URL` (default: `https://api.apifox.com`)
    /// - `APIFOX_API_VERSION` (default: `2024-03-28`)
    /// - `APIFOX_LOCALE` (default: `zh-CN`)
    /// - `APIFOX_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ApifoxConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let present = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_token = present("APIFOX_TOKEN").ok_or(ConfigError::MissingToken)?;
        let project_id = present("APIFOX_PROJECT_ID").ok_or(ConfigError::MissingProjectId)?;

        let base_raw = present("APIFOX_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(base_raw.trim())
            .map_err(|e| ConfigError::InvalidUrl("APIFOX_BASE_URL".to_string(), e.to_string()))?;

        let timeout_secs = match present("APIFOX_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::InvalidValue("APIFOX_TIMEOUT_SECS".to_string(), raw.clone())
            })?,
            None => 30,
        };

        Ok(Self {
            base_url,
            project_id: ProjectId::new(project_id.trim()),
            api_token: Zeroizing::new(api_token.trim().to_string()),
            api_version: present("APIFOX_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            locale: present("APIFOX_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            timeout_secs,
        })
    }

    /// Create a configuration pointing to a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local_mock(base_url: &str, project_id: &str, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Url::parse(base_url)
                .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?,
            project_id: ProjectId::new(project_id),
            api_token: Zeroizing::new(token.to_string()),
            api_version: DEFAULT_API_VERSION.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            timeout_secs: 5,
        })
    }

    /// The token with everything but its edges hidden: first 8 and last 4
    /// characters when longer than 12, otherwise `***`.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.api_token.chars().collect();
        if chars.len() > 12 {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        } else {
            "***".to_string()
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APIFOX_TOKEN environment variable is required")]
    MissingToken,
    #[error("APIFOX_PROJECT_ID environment variable is required")]
    MissingProjectId,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {0}: \"{1}\"")]
    InvalidValue(String, String),
}
