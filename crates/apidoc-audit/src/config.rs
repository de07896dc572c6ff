//! Audit configuration.

use std::time::Duration;

/// Tuning for [`crate::Auditor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    /// Items requested per listing page.
    pub page_size: u32,
    /// Maximum detail fetches in flight at once. Always at least 1.
    pub concurrency: usize,
    /// Upper bound on a single detail fetch, retries included.
    pub fetch_timeout: Duration,
    /// Overall scan deadline, measured from the start of the audit.
    pub deadline: Option<Duration>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            concurrency: 4,
            fetch_timeout: Duration::from_secs(60),
            deadline: None,
        }
    }
}

impl AuditConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `APIFOX_AUDIT_PAGE_SIZE` (default: 100)
    /// - `APIFOX_AUDIT_CONCURRENCY` (default: 4)
    /// - `APIFOX_AUDIT_FETCH_TIMEOUT_SECS` (default: 60)
    /// - `APIFOX_AUDIT_DEADLINE_SECS` (default: none)
    pub fn from_env() -> Result<Self, AuditConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`AuditConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AuditConfigError> {
        let mut config = Self::default();
        if let Some(n) = positive(&lookup, "APIFOX_AUDIT_PAGE_SIZE")? {
            config.page_size = u32::try_from(n).map_err(|_| AuditConfigError::InvalidValue {
                var: "APIFOX_AUDIT_PAGE_SIZE",
                value: n.to_string(),
            })?;
        }
        if let Some(n) = positive(&lookup, "APIFOX_AUDIT_CONCURRENCY")? {
            config.concurrency = n as usize;
        }
        if let Some(n) = positive(&lookup, "APIFOX_AUDIT_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(n);
        }
        if let Some(n) = positive(&lookup, "APIFOX_AUDIT_DEADLINE_SECS")? {
            config.deadline = Some(Duration::from_secs(n));
        }
        Ok(config)
    }
}

fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, AuditConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(AuditConfigError::InvalidValue { var, value: raw }),
    }
}

/// Errors raised while loading an [`AuditConfig`].
#[derive(Debug, thiserror::Error)]
pub enum AuditConfigError {
    #[error("invalid value for {var}: \"{value}\" (expected a positive integer)")]
    InvalidValue { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AuditConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, AuditConfig::default());
        assert_eq!(cfg.page_size, 100);
        assert_eq!(cfg.concurrency, 4);
        assert!(cfg.deadline.is_none());
    }

    #[test]
    fn overrides_and_rejects_zero() {
        let cfg = AuditConfig::from_lookup(|var| match var {
            "APIFOX_AUDIT_PAGE_SIZE" => Some("50".into()),
            "APIFOX_AUDIT_DEADLINE_SECS" => Some("120".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.page_size, 50);
        assert_eq!(cfg.deadline, Some(Duration::from_secs(120)));

        let err = AuditConfig::from_lookup(|var| {
            (var == "APIFOX_AUDIT_CONCURRENCY").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("APIFOX_AUDIT_CONCURRENCY"));
    }
}
