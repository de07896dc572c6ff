//! # apidoc-rules — Documentation-Quality Rules
//!
//! Two components sit between the normalizer and the remote service:
//!
//! - **Standard error injector** ([`inject`]): completes a response map with
//!   the mandatory 4xx/5xx shapes for the endpoint's method, never touching
//!   a status the caller already defined. Idempotent.
//!
//! - **Rule engine** ([`RuleEngine`]): evaluates a normalized endpoint or
//!   data schema against every rule and returns the full, ordered list of
//!   [`ValidationViolation`]s. Violations are data; the engine never fails
//!   on well-formed input.
//!
//! - **Consistency checks** ([`consistency`]): project-wide route naming
//!   and response-shape uniformity.
//!
//! The language check is an injected [`LanguagePredicate`], so deployments
//! can swap the default CJK heuristic for a real detector.

pub mod config;
pub mod consistency;
pub mod engine;
pub mod inject;
pub mod language;
pub mod violation;

pub use config::{DocLanguage, RuleConfig, RuleConfigError, DEFAULT_PLACEHOLDERS};
pub use consistency::{
    path_naming_issues, validate_path_naming, PaginationFields, PathStyle, ResponseConsistency,
    ResponseTally, ShapeCount,
};
pub use engine::RuleEngine;
pub use inject::{
    inject_standard_errors, required_error_statuses, standard_error_schema, with_standard_errors,
};
pub use language::{AnyLanguage, CjkLanguage, LanguagePredicate};
pub use violation::{ResourceKind, ResourceRef, RuleCode, ValidationViolation};
