//! Data schema tools. Same shape as the endpoint tools, validated with the
//! schema-only rule subset and without error injection.

use serde::Deserialize;
use serde_json::Value;

use apidoc_core::{normalize_schema_definition, SchemaDefinition, SchemaId, SchemaSummary};

use crate::endpoints::DEFAULT_LIST_LIMIT;
use crate::error::ToolError;
use crate::{ApiDocTools, DeleteOutcome};

/// Arguments of `list_schemas`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaFilter {
    /// Case-insensitive match on name or description.
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SchemaFilter {
    fn matches(&self, summary: &SchemaSummary) -> bool {
        match self.keyword.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(keyword) => {
                let keyword = keyword.to_lowercase();
                summary.name.to_lowercase().contains(&keyword)
                    || summary.description.to_lowercase().contains(&keyword)
            }
        }
    }
}

impl ApiDocTools {
    /// `list_schemas`
    pub async fn list_schemas(&self, filter: &SchemaFilter) -> Result<Vec<SchemaSummary>, ToolError> {
        tracing::info!(keyword = filter.keyword.as_deref(), "list_schemas");
        let all = self.client.schemas().list_all(self.audit.page_size).await?;
        Ok(all
            .into_iter()
            .filter(|s| filter.matches(s))
            .take(filter.limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .collect())
    }

    /// `get_schema_detail`
    pub async fn get_schema_detail(&self, id: SchemaId) -> Result<SchemaDefinition, ToolError> {
        tracing::info!(schema_id = id.as_u64(), "get_schema_detail");
        Ok(self.client.schemas().get(id).await?)
    }

    /// `create_schema`: normalize, validate, refuse duplicate names, create.
    pub async fn create_schema(&self, payload: &Value) -> Result<SchemaDefinition, ToolError> {
        let mut def = normalize_schema_definition(payload)?;
        def.id = None;
        self.check_schema(&def)?;
        tracing::info!(name = %def.name, "create_schema");

        let existing = self.client.schemas().list_all(self.audit.page_size).await?;
        if let Some(dup) = existing.iter().find(|s| s.name == def.name) {
            return Err(ToolError::AlreadyExists {
                resource: format!("schema {}", def.name),
                existing: dup.id.as_u64(),
            });
        }

        Ok(self.client.schemas().create(&def).await?)
    }

    /// `update_schema`: identity comes from `id`.
    pub async fn update_schema(
        &self,
        id: SchemaId,
        payload: &Value,
    ) -> Result<SchemaDefinition, ToolError> {
        let mut def = normalize_schema_definition(payload)?;
        def.id = Some(id);
        self.check_schema(&def)?;
        tracing::info!(schema_id = id.as_u64(), "update_schema");
        Ok(self.client.schemas().update(id, &def).await?)
    }

    /// `delete_schema`. Without `confirm` nothing is sent.
    pub async fn delete_schema(&self, id: SchemaId, confirm: bool) -> Result<DeleteOutcome, ToolError> {
        let resource = format!("schema {}", id.as_u64());
        if !confirm {
            return Ok(DeleteOutcome::ConfirmationRequired { resource });
        }
        tracing::info!(schema_id = id.as_u64(), "delete_schema");
        self.client.schemas().delete(id).await?;
        Ok(DeleteOutcome::Deleted { resource })
    }

    fn check_schema(&self, def: &SchemaDefinition) -> Result<(), ToolError> {
        let violations = self.engine.validate_schema_definition(def);
        if violations.is_empty() {
            return Ok(());
        }
        tracing::warn!(name = %def.name, violations = violations.len(), "schema rejected");
        Err(ToolError::Rejected { violations })
    }
}
