//! Typed client for data-schema resources.
//!
//! | Method | Path (relative to project) | Operation |
//! |--------|----------------------------|-----------|
//! | GET    | `/data-schemas` | List (cursor, limit) |
//! | GET    | `/data-schemas/{id}` | Get detail |
//! | POST   | `/data-schemas` | Create |
//! | PUT    | `/data-schemas/{id}` | Replace |
//! | DELETE | `/data-schemas/{id}` | Delete |

use apidoc_core::{normalize_schema_definition, SchemaDefinition, SchemaId, SchemaSummary};
use serde_json::Value;

use crate::error::ApifoxApiError;
use crate::pagination::{Page, PageCursor};
use crate::transport::Transport;

const RESOURCE: &str = "data-schemas";

/// Client for data-schema resources.
#[derive(Debug, Clone)]
pub struct SchemaClient {
    transport: Transport,
}

impl SchemaClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn list_page(
        &self,
        cursor: Option<&PageCursor>,
        limit: u32,
    ) -> Result<Page<SchemaSummary>, ApifoxApiError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.as_str().to_string()));
        }
        self.transport
            .get_json("GET /data-schemas", RESOURCE, &query)
            .await
    }

    /// All schemas in listing order.
    pub async fn list_all(&self, page_size: u32) -> Result<Vec<SchemaSummary>, ApifoxApiError> {
        let mut out = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        loop {
            let page = self.list_page(cursor.as_ref(), page_size).await?;
            out.extend(page.items);
            match page.next_cursor {
                Some(next) if cursor.as_ref() != Some(&next) => cursor = Some(next),
                _ => break,
            }
        }
        Ok(out)
    }

    pub async fn get(&self, id: SchemaId) -> Result<SchemaDefinition, ApifoxApiError> {
        let endpoint = format!("GET /data-schemas/{}", id.as_u64());
        let value = self
            .transport
            .get_value(&endpoint, &format!("{RESOURCE}/{}", id.as_u64()), &[])
            .await?;
        into_definition(&endpoint, &value, Some(id))
    }

    pub async fn create(&self, def: &SchemaDefinition) -> Result<SchemaDefinition, ApifoxApiError> {
        let endpoint = "POST /data-schemas";
        let value = self
            .transport
            .send(reqwest::Method::POST, endpoint, RESOURCE, Some(def))
            .await?;
        into_definition(endpoint, &value, None)
    }

    pub async fn update(
        &self,
        id: SchemaId,
        def: &SchemaDefinition,
    ) -> Result<SchemaDefinition, ApifoxApiError> {
        let endpoint = format!("PUT /data-schemas/{}", id.as_u64());
        let value = self
            .transport
            .send(
                reqwest::Method::PUT,
                &endpoint,
                &format!("{RESOURCE}/{}", id.as_u64()),
                Some(def),
            )
            .await?;
        if value.is_null() {
            let mut echoed = def.clone();
            echoed.id = Some(id);
            return Ok(echoed);
        }
        into_definition(&endpoint, &value, Some(id))
    }

    pub async fn delete(&self, id: SchemaId) -> Result<(), ApifoxApiError> {
        let endpoint = format!("DELETE /data-schemas/{}", id.as_u64());
        self.transport
            .send::<Value>(
                reqwest::Method::DELETE,
                &endpoint,
                &format!("{RESOURCE}/{}", id.as_u64()),
                None,
            )
            .await?;
        Ok(())
    }
}

fn into_definition(
    endpoint: &str,
    value: &Value,
    id: Option<SchemaId>,
) -> Result<SchemaDefinition, ApifoxApiError> {
    let mut def = normalize_schema_definition(value).map_err(|e| ApifoxApiError::Malformed {
        endpoint: endpoint.into(),
        source: e,
    })?;
    if def.id.is_none() {
        def.id = id;
    }
    Ok(def)
}
