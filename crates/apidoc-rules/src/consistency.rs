//! # Project Consistency Checks
//!
//! Two cross-endpoint checks that look at a project as a whole rather than
//! at a single definition:
//!
//! - **Path naming**: every literal route segment follows one
//!   [`PathStyle`], and path parameters are lowercase identifiers.
//! - **Response consistency**: success and error responses share a small
//!   number of top-level shapes, and pagination fields use one name each.
//!
//! Path naming yields [`ValidationViolation`]s like the rule engine does.
//! Response consistency is a tally, not a per-endpoint verdict.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use apidoc_core::{EndpointDefinition, EndpointRef, SchemaKind, SchemaNode};

use crate::violation::{ResourceRef, RuleCode, ValidationViolation};

// ---------------------------------------------------------------------------
// Path naming
// ---------------------------------------------------------------------------

/// Naming style for literal route segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathStyle {
    /// `/user-profiles`
    #[default]
    #[serde(rename = "kebab-case")]
    KebabCase,
    /// `/user_profiles`
    #[serde(rename = "snake_case")]
    SnakeCase,
    /// `/userProfiles`
    #[serde(rename = "camelCase")]
    CamelCase,
}

impl PathStyle {
    pub const ALL: [PathStyle; 3] = [Self::KebabCase, Self::SnakeCase, Self::CamelCase];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw.trim())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KebabCase => "kebab-case",
            Self::SnakeCase => "snake_case",
            Self::CamelCase => "camelCase",
        }
    }

    /// Whether a literal segment follows this style.
    pub fn accepts(&self, segment: &str) -> bool {
        let mut chars = segment.chars();
        if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
            return false;
        }
        match self {
            Self::KebabCase => separated_lowercase(segment, '-'),
            Self::SnakeCase => separated_lowercase(segment, '_'),
            Self::CamelCase => chars.all(|c| c.is_ascii_alphanumeric()),
        }
    }
}

impl std::fmt::Display for PathStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase alphanumeric words joined by single `sep` characters.
fn separated_lowercase(segment: &str, sep: char) -> bool {
    segment.split(sep).all(|word| {
        !word.is_empty()
            && word
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}

/// Every naming problem of `path` under `style`, in segment order.
pub fn path_naming_issues(path: &str, style: PathStyle) -> Vec<String> {
    let mut issues = Vec::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                if name != name.to_lowercase() {
                    issues.push(format!(
                        "path parameter {segment} should be lowercase: {{{}}}",
                        name.to_lowercase()
                    ));
                }
                let valid = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
                    && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
                if !valid {
                    issues.push(format!("path parameter {segment} contains invalid characters"));
                }
            }
            None if !style.accepts(segment) => {
                issues.push(format!("segment \"{segment}\" is not {style}"));
            }
            None => {}
        }
    }
    issues
}

/// One [`RuleCode::PathNaming`] violation per naming problem of the
/// endpoint's route.
pub fn validate_path_naming(endpoint: &EndpointRef, style: PathStyle) -> Vec<ValidationViolation> {
    let resource = ResourceRef::from(endpoint);
    path_naming_issues(&endpoint.path, style)
        .into_iter()
        .map(|message| ValidationViolation {
            resource: resource.clone(),
            rule: RuleCode::PathNaming,
            path: "$.path".into(),
            message,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Response consistency
// ---------------------------------------------------------------------------

/// More distinct success shapes than this is reported as inconsistent.
pub const MAX_SUCCESS_SHAPES: usize = 3;

/// More distinct error shapes than this is reported as inconsistent.
pub const MAX_ERROR_SHAPES: usize = 2;

const PAGE_FIELDS: [&str; 4] = ["page", "pageNum", "pageNumber", "current"];
const PAGE_SIZE_FIELDS: [&str; 4] = ["pageSize", "page_size", "size", "limit"];
const TOTAL_FIELDS: [&str; 3] = ["total", "totalCount", "total_count"];

/// A top-level response shape and how often it occurs. An empty field list
/// stands for a response without properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCount {
    pub fields: Vec<String>,
    pub count: usize,
}

/// Pagination field names seen in success responses, by role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationFields {
    pub page: BTreeMap<String, usize>,
    pub page_size: BTreeMap<String, usize>,
    pub total: BTreeMap<String, usize>,
}

impl PaginationFields {
    /// At most one spelling per role.
    pub fn is_uniform(&self) -> bool {
        self.page.len() <= 1 && self.page_size.len() <= 1 && self.total.len() <= 1
    }

    fn observe(&mut self, properties: &BTreeMap<String, SchemaNode>) {
        let roles = [
            (&PAGE_FIELDS[..], &mut self.page),
            (&PAGE_SIZE_FIELDS[..], &mut self.page_size),
            (&TOTAL_FIELDS[..], &mut self.total),
        ];
        for (names, seen) in roles {
            for name in names.iter().filter(|n| properties.contains_key(**n)) {
                *seen.entry(name.to_string()).or_default() += 1;
            }
        }
    }
}

/// Response-shape tally across a set of endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseConsistency {
    pub endpoints: usize,
    /// Most frequent first.
    pub success_shapes: Vec<ShapeCount>,
    /// Most frequent first.
    pub error_shapes: Vec<ShapeCount>,
    pub pagination: PaginationFields,
    pub success_uniform: bool,
    pub errors_uniform: bool,
    pub pagination_uniform: bool,
}

/// Accumulates endpoints into a [`ResponseConsistency`].
#[derive(Debug, Default)]
pub struct ResponseTally {
    endpoints: usize,
    success: BTreeMap<Vec<String>, usize>,
    errors: BTreeMap<Vec<String>, usize>,
    pagination: PaginationFields,
}

impl ResponseTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, def: &EndpointDefinition) {
        self.endpoints += 1;
        for (status, schema) in &def.response_schema {
            let properties = match &schema.kind {
                SchemaKind::Object { properties, .. } => Some(properties),
                _ => None,
            };
            let shape: Vec<String> = properties
                .map(|p| p.keys().cloned().collect())
                .unwrap_or_default();

            if status.is_success() {
                *self.success.entry(shape).or_default() += 1;
                if let Some(properties) = properties {
                    self.pagination.observe(properties);
                }
            } else if status.as_u16() >= 400 {
                *self.errors.entry(shape).or_default() += 1;
            }
        }
    }

    pub fn finish(self) -> ResponseConsistency {
        let success_shapes = ranked(self.success);
        let error_shapes = ranked(self.errors);
        ResponseConsistency {
            endpoints: self.endpoints,
            success_uniform: success_shapes.len() <= MAX_SUCCESS_SHAPES,
            errors_uniform: error_shapes.len() <= MAX_ERROR_SHAPES,
            pagination_uniform: self.pagination.is_uniform(),
            success_shapes,
            error_shapes,
            pagination: self.pagination,
        }
    }
}

/// Descending by count; ties keep the field-list order.
fn ranked(counts: BTreeMap<Vec<String>, usize>) -> Vec<ShapeCount> {
    let mut shapes: Vec<ShapeCount> = counts
        .into_iter()
        .map(|(fields, count)| ShapeCount { fields, count })
        .collect();
    shapes.sort_by(|a, b| b.count.cmp(&a.count));
    shapes
}
