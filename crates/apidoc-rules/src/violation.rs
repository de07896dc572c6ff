//! # Validation Violations
//!
//! A violation is a detected deviation from a documentation-quality rule.
//! Violations are produced transiently by the rule engine and consumed
//! either by the create/update reject path or by the audit aggregator;
//! they are never persisted.

use serde::{Deserialize, Serialize};

use apidoc_core::{EndpointDefinition, EndpointRef, SchemaDefinition};

/// Resource namespace a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Endpoint,
    Schema,
}

/// The resource a violation cites: kind, id once created, and a label a
/// human can recognise (`GET /users/{id}` or the schema name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub label: String,
}

impl ResourceRef {
    pub fn endpoint(def: &EndpointDefinition) -> Self {
        Self::from(&def.reference())
    }

    pub fn schema(def: &SchemaDefinition) -> Self {
        Self {
            kind: ResourceKind::Schema,
            id: def.id.map(|id| id.as_u64()),
            label: def.name.clone(),
        }
    }
}

impl From<&EndpointRef> for ResourceRef {
    fn from(r: &EndpointRef) -> Self {
        Self {
            kind: ResourceKind::Endpoint,
            id: r.id.map(|id| id.as_u64()),
            label: format!("{} {}", r.method, r.path),
        }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            ResourceKind::Endpoint => "endpoint",
            ResourceKind::Schema => "schema",
        };
        match self.id {
            Some(id) => write!(f, "{kind}:{id} {}", self.label),
            None => write!(f, "{kind} {}", self.label),
        }
    }
}

/// Stable rule identifiers. The kebab-case form is the wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCode {
    TitleRequired,
    DescriptionRequired,
    TitleLanguage,
    DescriptionLanguage,
    TitleFormat,
    FieldDescriptionRequired,
    ExampleRequired,
    ExamplePlaceholder,
    ExampleKindMismatch,
    ParameterDescriptionRequired,
    RequestBodyRequired,
    SuccessResponseRequired,
    ErrorResponseRequired,
    PathNaming,
}

impl RuleCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TitleRequired => "title-required",
            Self::DescriptionRequired => "description-required",
            Self::TitleLanguage => "title-language",
            Self::DescriptionLanguage => "description-language",
            Self::TitleFormat => "title-format",
            Self::FieldDescriptionRequired => "field-description-required",
            Self::ExampleRequired => "example-required",
            Self::ExamplePlaceholder => "example-placeholder",
            Self::ExampleKindMismatch => "example-kind-mismatch",
            Self::ParameterDescriptionRequired => "parameter-description-required",
            Self::RequestBodyRequired => "request-body-required",
            Self::SuccessResponseRequired => "success-response-required",
            Self::ErrorResponseRequired => "error-response-required",
            Self::PathNaming => "path-naming",
        }
    }
}

impl std::fmt::Display for RuleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub resource: ResourceRef,
    pub rule: RuleCode,
    /// `$`-rooted path of the offending element, e.g.
    /// `$.responses.200.properties.id`.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} at {}: {}", self.rule, self.resource, self.path, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_code_serializes_as_kebab_case() {
        for code in [
            RuleCode::TitleRequired,
            RuleCode::FieldDescriptionRequired,
            RuleCode::ExampleKindMismatch,
            RuleCode::ErrorResponseRequired,
            RuleCode::PathNaming,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::String(code.as_str().to_string()));
        }
    }

    #[test]
    fn resource_ref_display() {
        let r = ResourceRef {
            kind: ResourceKind::Endpoint,
            id: Some(7),
            label: "GET /users/{id}".into(),
        };
        assert_eq!(r.to_string(), "endpoint:7 GET /users/{id}");
    }
}
