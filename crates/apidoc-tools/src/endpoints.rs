//! Endpoint tools.

use serde::Deserialize;
use serde_json::Value;

use apidoc_audit::{AuditReport, Auditor};
use apidoc_client::ListScope;
use apidoc_core::{normalize_endpoint, EndpointDefinition, EndpointId, EndpointSummary, FolderId};
use apidoc_rules::{with_standard_errors, ValidationViolation};

use crate::error::ToolError;
use crate::{ApiDocTools, DeleteOutcome};

/// Result cap for listings when the caller gives none.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Arguments of `list_api_endpoints`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointFilter {
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Case-insensitive match on title or path.
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl EndpointFilter {
    fn scope(&self) -> ListScope {
        ListScope {
            folder_id: self.folder_id,
            tag: self.tag.clone(),
        }
    }

    fn matches(&self, summary: &EndpointSummary) -> bool {
        match self.keyword.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(keyword) => {
                let keyword = keyword.to_lowercase();
                summary.title.to_lowercase().contains(&keyword)
                    || summary.path.to_lowercase().contains(&keyword)
            }
        }
    }
}

impl ApiDocTools {
    /// `list_api_endpoints`: summaries in listing order, filtered and capped.
    pub async fn list_api_endpoints(
        &self,
        filter: &EndpointFilter,
    ) -> Result<Vec<EndpointSummary>, ToolError> {
        tracing::info!(
            folder_id = filter.folder_id.map(|f| f.as_u64()),
            tag = filter.tag.as_deref(),
            keyword = filter.keyword.as_deref(),
            "list_api_endpoints"
        );
        let limit = filter.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let all = self
            .client
            .endpoints()
            .list_all(&filter.scope(), self.audit.page_size)
            .await?;
        Ok(all
            .into_iter()
            .filter(|s| filter.matches(s))
            .take(limit)
            .collect())
    }

    /// `get_api_endpoint_detail`
    pub async fn get_api_endpoint_detail(
        &self,
        id: EndpointId,
    ) -> Result<EndpointDefinition, ToolError> {
        tracing::info!(endpoint_id = id.as_u64(), "get_api_endpoint_detail");
        Ok(self.client.endpoints().get(id).await?)
    }

    /// `create_api_endpoint`: normalize, inject standard errors, validate,
    /// refuse duplicates by method and path, then create.
    pub async fn create_api_endpoint(
        &self,
        payload: &Value,
    ) -> Result<EndpointDefinition, ToolError> {
        let mut def = normalize_endpoint(payload)?;
        // Identity is assigned by the service.
        def.id = None;
        let def = self.prepare_endpoint(def)?;
        tracing::info!(method = def.method.as_str(), path = %def.path, "create_api_endpoint");

        let existing = self
            .client
            .endpoints()
            .list_all(&ListScope::all(), self.audit.page_size)
            .await?;
        if let Some(dup) = existing
            .iter()
            .find(|s| s.method == def.method && s.path == def.path)
        {
            return Err(ToolError::AlreadyExists {
                resource: format!("endpoint {} {}", def.method.as_str(), def.path),
                existing: dup.id.as_u64(),
            });
        }

        Ok(self.client.endpoints().create(&def).await?)
    }

    /// `update_api_endpoint`: the create pipeline, with the identity taken
    /// from `id` and never from the payload.
    pub async fn update_api_endpoint(
        &self,
        id: EndpointId,
        payload: &Value,
    ) -> Result<EndpointDefinition, ToolError> {
        let mut def = normalize_endpoint(payload)?;
        def.id = Some(id);
        let def = self.prepare_endpoint(def)?;
        tracing::info!(endpoint_id = id.as_u64(), "update_api_endpoint");
        Ok(self.client.endpoints().update(id, &def).await?)
    }

    /// `delete_api_endpoint`. Without `confirm` nothing is sent.
    pub async fn delete_api_endpoint(
        &self,
        id: EndpointId,
        confirm: bool,
    ) -> Result<DeleteOutcome, ToolError> {
        let resource = format!("endpoint {}", id.as_u64());
        if !confirm {
            tracing::info!(endpoint_id = id.as_u64(), "delete_api_endpoint awaiting confirmation");
            return Ok(DeleteOutcome::ConfirmationRequired { resource });
        }
        tracing::info!(endpoint_id = id.as_u64(), "delete_api_endpoint");
        self.client.endpoints().delete(id).await?;
        Ok(DeleteOutcome::Deleted { resource })
    }

    /// `check_api_responses`: violations of the stored endpoint as it is.
    /// Read-only; nothing is injected.
    pub async fn check_api_responses(
        &self,
        id: EndpointId,
    ) -> Result<Vec<ValidationViolation>, ToolError> {
        tracing::info!(endpoint_id = id.as_u64(), "check_api_responses");
        let def = self.client.endpoints().get(id).await?;
        Ok(self.engine.validate_endpoint(&def))
    }

    /// `audit_all_api_responses`: project-wide completeness report.
    pub async fn audit_all_api_responses(&self, scope: &ListScope) -> AuditReport {
        tracing::info!(
            folder_id = scope.folder_id.map(|f| f.as_u64()),
            tag = scope.tag.as_deref(),
            "audit_all_api_responses"
        );
        let auditor = Auditor::new(
            std::sync::Arc::clone(&self.client),
            self.engine.clone(),
            self.audit.clone(),
        );
        auditor.audit(scope).await
    }

    /// `get_apis_by_tag`
    pub async fn get_apis_by_tag(&self, tag: &str) -> Result<Vec<EndpointSummary>, ToolError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(ToolError::InvalidArgument("tag must not be empty".into()));
        }
        tracing::info!(tag, "get_apis_by_tag");
        let scope = ListScope {
            folder_id: None,
            tag: Some(tag.to_string()),
        };
        Ok(self
            .client
            .endpoints()
            .list_all(&scope, self.audit.page_size)
            .await?)
    }

    /// `add_tag_to_api`: merge `tags` into the endpoint's tag set and write
    /// the full definition back. No write happens when nothing is new.
    pub async fn add_tag_to_api(
        &self,
        id: EndpointId,
        tags: &[String],
    ) -> Result<EndpointDefinition, ToolError> {
        let new_tags: Vec<String> = tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if new_tags.is_empty() {
            return Err(ToolError::InvalidArgument("at least one non-empty tag is required".into()));
        }
        tracing::info!(endpoint_id = id.as_u64(), tags = ?new_tags, "add_tag_to_api");

        let mut def = self.client.endpoints().get(id).await?;
        let before = def.tags.len();
        def.tags.extend(new_tags);
        if def.tags.len() == before {
            tracing::debug!(endpoint_id = id.as_u64(), "tags already present, skipping write");
            return Ok(def);
        }
        Ok(self.client.endpoints().update(id, &def).await?)
    }

    /// Inject standard errors and validate. Any violation rejects.
    pub(crate) fn prepare_endpoint(
        &self,
        def: EndpointDefinition,
    ) -> Result<EndpointDefinition, ToolError> {
        let def = with_standard_errors(def);
        let violations = self.engine.validate_endpoint(&def);
        if !violations.is_empty() {
            tracing::warn!(
                method = def.method.as_str(),
                path = %def.path,
                violations = violations.len(),
                "endpoint rejected"
            );
            return Err(ToolError::Rejected { violations });
        }
        Ok(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apidoc_core::HttpMethod;

    fn summary(title: &str, path: &str) -> EndpointSummary {
        EndpointSummary {
            id: EndpointId(1),
            title: title.into(),
            method: HttpMethod::Get,
            path: path.into(),
            tags: Vec::new(),
            folder_id: FolderId::ROOT,
            status: None,
        }
    }

    #[test]
    fn keyword_matches_title_or_path_case_insensitively() {
        let filter = EndpointFilter {
            keyword: Some("Users".into()),
            ..Default::default()
        };
        assert!(filter.matches(&summary("获取用户", "/users/{id}")));
        assert!(filter.matches(&summary("USERS 列表", "/list")));
        assert!(!filter.matches(&summary("获取订单", "/orders")));
    }

    #[test]
    fn blank_keyword_matches_everything() {
        let filter = EndpointFilter {
            keyword: Some("  ".into()),
            ..Default::default()
        };
        assert!(filter.matches(&summary("获取订单", "/orders")));
    }

    #[test]
    fn filter_deserializes_with_defaults() {
        let filter: EndpointFilter =
            serde_json::from_value(serde_json::json!({"tag": "用户"})).unwrap();
        assert_eq!(filter.tag.as_deref(), Some("用户"));
        assert!(filter.folder_id.is_none());
        assert!(filter.limit.is_none());
    }
}
