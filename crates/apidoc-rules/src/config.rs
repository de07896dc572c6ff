//! Rule engine configuration.
//!
//! Defaults match a Chinese-language documentation project. Override via
//! environment variables or explicit construction.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::language::{AnyLanguage, CjkLanguage, LanguagePredicate};

/// Example values treated as type placeholders rather than real data.
pub const DEFAULT_PLACEHOLDERS: [&str; 10] = [
    "string", "number", "integer", "boolean", "true", "false", "null", "object", "array", "",
];

/// Documentation language selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocLanguage {
    /// Titles and descriptions must contain CJK text.
    #[default]
    Chinese,
    /// No language requirement.
    Any,
}

impl DocLanguage {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "chinese" | "cjk" => Some(Self::Chinese),
            "any" | "none" => Some(Self::Any),
            _ => None,
        }
    }

    pub fn predicate(&self) -> Arc<dyn LanguagePredicate> {
        match self {
            Self::Chinese => Arc::new(CjkLanguage),
            Self::Any => Arc::new(AnyLanguage),
        }
    }
}

/// Configuration for [`crate::RuleEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub language: DocLanguage,
    /// Lower-cased, trimmed placeholder examples.
    pub placeholders: BTreeSet<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            language: DocLanguage::default(),
            placeholders: DEFAULT_PLACEHOLDERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RuleConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `APIFOX_DOC_LANGUAGE` (`zh` | `any`, default: `zh`)
    /// - `APIFOX_PLACEHOLDERS` (comma-separated, default: built-in list)
    pub fn from_env() -> Result<Self, RuleConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`RuleConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RuleConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("APIFOX_DOC_LANGUAGE") {
            config.language = DocLanguage::parse(&raw).ok_or_else(|| RuleConfigError::InvalidValue {
                var: "APIFOX_DOC_LANGUAGE",
                value: raw.clone(),
            })?;
        }

        if let Some(raw) = lookup("APIFOX_PLACEHOLDERS") {
            // The empty string is always a placeholder; the list only adds to it.
            config.placeholders = raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .chain(std::iter::once(String::new()))
                .collect();
        }

        Ok(config)
    }

    /// Whether `example` is a bare type placeholder (case-insensitive, trimmed).
    pub fn is_placeholder(&self, example: &str) -> bool {
        self.placeholders.contains(&example.trim().to_lowercase())
    }
}

/// Errors raised while loading a [`RuleConfig`].
#[derive(Debug, thiserror::Error)]
pub enum RuleConfigError {
    #[error("invalid value for {var}: \"{value}\"")]
    InvalidValue { var: &'static str, value: String },
}
