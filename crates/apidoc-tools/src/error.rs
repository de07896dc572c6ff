//! # Tool Error
//!
//! Maps normalizer, rule engine and remote failures to one error type with
//! a stable machine-readable code and a JSON error body.

use serde_json::{json, Value};
use thiserror::Error;

use apidoc_client::ApifoxApiError;
use apidoc_core::StructuralError;
use apidoc_rules::ValidationViolation;

/// Errors a tool call can end with.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The payload is not a well-formed resource. Nothing was sent.
    #[error("malformed payload: {0}")]
    Structural(#[from] StructuralError),

    /// The payload is well-formed but breaks documentation rules. Nothing
    /// was sent.
    #[error("rejected with {} violation(s)", violations.len())]
    Rejected { violations: Vec<ValidationViolation> },

    /// A resource with the same identity already exists.
    #[error("{resource} already exists (id {existing})")]
    AlreadyExists { resource: String, existing: u64 },

    /// The service has no such resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// A tool argument is unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The service call failed.
    #[error(transparent)]
    Remote(ApifoxApiError),
}

impl From<ApifoxApiError> for ToolError {
    fn from(err: ApifoxApiError) -> Self {
        if err.is_not_found() {
            ToolError::NotFound(err.to_string())
        } else {
            ToolError::Remote(err)
        }
    }
}

impl ToolError {
    /// Stable error code for callers that branch on the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::Structural(_) => "MALFORMED_PAYLOAD",
            ToolError::Rejected { .. } => "VALIDATION_FAILED",
            ToolError::AlreadyExists { .. } => "ALREADY_EXISTS",
            ToolError::NotFound(_) => "NOT_FOUND",
            ToolError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ToolError::Remote(_) => "REMOTE_ERROR",
        }
    }

    /// Upstream HTTP status, when the service produced one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ToolError::Remote(e) => e.status(),
            ToolError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// JSON error body: `{"error": {"code", "message", "details"?}}`.
    pub fn to_body(&self) -> Value {
        let mut error = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        let details = match self {
            ToolError::Structural(e) => Some(json!({ "path": e.path() })),
            ToolError::Rejected { violations } => Some(json!({ "violations": violations })),
            ToolError::AlreadyExists { existing, .. } => Some(json!({ "existing_id": existing })),
            ToolError::Remote(e) => e.status().map(|s| json!({ "status": s })),
            _ => None,
        };
        if let Some(details) = details {
            error["details"] = details;
        }
        json!({ "error": error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidoc_rules::{ResourceKind, ResourceRef, RuleCode};

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err: ToolError = ApifoxApiError::ApiError {
            endpoint: "GET /api-endpoints/9".into(),
            status: 404,
            body: "接口不存在".into(),
        }
        .into();
        assert!(matches!(err, ToolError::NotFound(_)));
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.upstream_status(), Some(404));
    }

    #[test]
    fn other_statuses_stay_remote() {
        let err: ToolError = ApifoxApiError::ApiError {
            endpoint: "POST /api-endpoints".into(),
            status: 403,
            body: "无权限".into(),
        }
        .into();
        assert_eq!(err.code(), "REMOTE_ERROR");
        assert_eq!(err.to_body()["error"]["details"]["status"], 403);
    }

    #[test]
    fn rejected_body_lists_violations() {
        let err = ToolError::Rejected {
            violations: vec![ValidationViolation {
                resource: ResourceRef {
                    kind: ResourceKind::Endpoint,
                    id: None,
                    label: "GET /users/{id}".into(),
                },
                rule: RuleCode::TitleRequired,
                path: "$.title".into(),
                message: "title is required".into(),
            }],
        };
        let body = err.to_body();
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(body["error"]["details"]["violations"][0]["rule"], "title-required");
        assert_eq!(body["error"]["details"]["violations"][0]["path"], "$.title");
    }

    #[test]
    fn structural_body_carries_path() {
        let err = ToolError::from(StructuralError::MissingKey {
            path: "$".into(),
            key: "title".into(),
        });
        assert_eq!(err.code(), "MALFORMED_PAYLOAD");
        assert_eq!(err.to_body()["error"]["details"]["path"], "$");
    }
}
