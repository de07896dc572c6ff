//! Project-wide consistency tools. Read-only.

use serde::Serialize;

use apidoc_audit::{AuditFailure, FailureKind};
use apidoc_client::ListScope;
use apidoc_rules::{
    validate_path_naming, PathStyle, ResponseConsistency, ResponseTally, ValidationViolation,
};

use crate::error::ToolError;
use crate::ApiDocTools;

/// Result of `check_path_naming_convention`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathNamingReport {
    pub style: PathStyle,
    pub total: usize,
    pub compliant: usize,
    /// Grouped by endpoint, in listing order.
    pub violations: Vec<ValidationViolation>,
}

impl PathNamingReport {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Result of `check_response_consistency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseConsistencyReport {
    #[serde(flatten)]
    pub consistency: ResponseConsistency,
    /// Listed endpoints whose detail could not be read.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<AuditFailure>,
}

impl ApiDocTools {
    /// `check_path_naming_convention`: route segments of every endpoint
    /// against `style` (`kebab-case`, `snake_case` or `camelCase`).
    pub async fn check_path_naming_convention(
        &self,
        style: &str,
    ) -> Result<PathNamingReport, ToolError> {
        let style = PathStyle::parse(style).ok_or_else(|| {
            ToolError::InvalidArgument(format!(
                "unsupported naming style \"{style}\", expected kebab-case, snake_case or camelCase"
            ))
        })?;
        tracing::info!(style = style.as_str(), "check_path_naming_convention");

        let summaries = self
            .client
            .endpoints()
            .list_all(&ListScope::all(), self.audit.page_size)
            .await?;

        let mut violations = Vec::new();
        let mut compliant = 0;
        for summary in &summaries {
            let found = validate_path_naming(&summary.reference(), style);
            if found.is_empty() {
                compliant += 1;
            }
            violations.extend(found);
        }
        Ok(PathNamingReport {
            style,
            total: summaries.len(),
            compliant,
            violations,
        })
    }

    /// `check_response_consistency`: response-shape tally over every
    /// endpoint under `scope`. Endpoints that fail to load are listed, not
    /// fatal.
    pub async fn check_response_consistency(
        &self,
        scope: &ListScope,
    ) -> Result<ResponseConsistencyReport, ToolError> {
        tracing::info!(
            folder_id = scope.folder_id.map(|f| f.as_u64()),
            tag = scope.tag.as_deref(),
            "check_response_consistency"
        );
        let summaries = self
            .client
            .endpoints()
            .list_all(scope, self.audit.page_size)
            .await?;

        let mut tally = ResponseTally::new();
        let mut failures = Vec::new();
        for summary in summaries {
            match self.client.endpoints().get(summary.id).await {
                Ok(def) => tally.observe(&def),
                Err(e) => {
                    tracing::warn!(
                        endpoint_id = summary.id.as_u64(),
                        error = %e,
                        "endpoint detail unreadable"
                    );
                    failures.push(AuditFailure {
                        endpoint: summary.reference(),
                        kind: FailureKind::Fetch,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(ResponseConsistencyReport {
            consistency: tally.finish(),
            failures,
        })
    }
}
