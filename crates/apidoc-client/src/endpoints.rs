//! Typed client for API endpoint resources.
//!
//! | Method | Path (relative to project) | Operation |
//! |--------|----------------------------|-----------|
//! | GET    | `/api-endpoints` | List (cursor, limit, folderId, tag) |
//! | GET    | `/api-endpoints/{id}` | Get detail |
//! | POST   | `/api-endpoints` | Create |
//! | PUT    | `/api-endpoints/{id}` | Replace |
//! | DELETE | `/api-endpoints/{id}` | Delete |
//!
//! Details are run through the normalizer, so callers only ever see a
//! structurally valid [`EndpointDefinition`].

use apidoc_core::{normalize_endpoint, EndpointDefinition, EndpointId, EndpointSummary};
use serde_json::Value;

use crate::error::ApifoxApiError;
use crate::pagination::{ListScope, Page, PageCursor};
use crate::transport::Transport;

const RESOURCE: &str = "api-endpoints";

/// Client for endpoint resources.
#[derive(Debug, Clone)]
pub struct EndpointClient {
    transport: Transport,
}

impl EndpointClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Fetch one listing page.
    ///
    /// Calls `GET {project}/api-endpoints?cursor=..&limit=..`.
    pub async fn list_page(
        &self,
        scope: &ListScope,
        cursor: Option<&PageCursor>,
        limit: u32,
    ) -> Result<Page<EndpointSummary>, ApifoxApiError> {
        let mut query = scope.query_pairs();
        query.push(("limit", limit.to_string()));
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.as_str().to_string()));
        }
        self.transport
            .get_json("GET /api-endpoints", RESOURCE, &query)
            .await
    }

    /// Walk every listing page and return all summaries in listing order.
    pub async fn list_all(
        &self,
        scope: &ListScope,
        page_size: u32,
    ) -> Result<Vec<EndpointSummary>, ApifoxApiError> {
        let mut out = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        loop {
            let page = self.list_page(scope, cursor.as_ref(), page_size).await?;
            out.extend(page.items);
            match page.next_cursor {
                Some(next) if cursor.as_ref() != Some(&next) => cursor = Some(next),
                Some(next) => {
                    tracing::warn!(cursor = next.as_str(), "listing cursor did not advance, stopping");
                    break;
                }
                None => break,
            }
        }
        Ok(out)
    }

    /// Fetch and normalize one endpoint.
    ///
    /// Calls `GET {project}/api-endpoints/{id}`.
    pub async fn get(&self, id: EndpointId) -> Result<EndpointDefinition, ApifoxApiError> {
        let endpoint = format!("GET /api-endpoints/{}", id.as_u64());
        let value = self
            .transport
            .get_value(&endpoint, &format!("{RESOURCE}/{}", id.as_u64()), &[])
            .await?;
        into_definition(&endpoint, &value, Some(id))
    }

    /// Create an endpoint from a normalized definition.
    ///
    /// Calls `POST {project}/api-endpoints`. Sent once, never retried.
    pub async fn create(
        &self,
        def: &EndpointDefinition,
    ) -> Result<EndpointDefinition, ApifoxApiError> {
        let endpoint = "POST /api-endpoints";
        let value = self
            .transport
            .send(reqwest::Method::POST, endpoint, RESOURCE, Some(def))
            .await?;
        into_definition(endpoint, &value, None)
    }

    /// Replace an endpoint with a normalized definition.
    ///
    /// Calls `PUT {project}/api-endpoints/{id}`. Sent once, never retried.
    pub async fn update(
        &self,
        id: EndpointId,
        def: &EndpointDefinition,
    ) -> Result<EndpointDefinition, ApifoxApiError> {
        let endpoint = format!("PUT /api-endpoints/{}", id.as_u64());
        let value = self
            .transport
            .send(
                reqwest::Method::PUT,
                &endpoint,
                &format!("{RESOURCE}/{}", id.as_u64()),
                Some(def),
            )
            .await?;
        // Some deployments answer 204; echo the definition back in that case.
        if value.is_null() {
            let mut echoed = def.clone();
            echoed.id = Some(id);
            return Ok(echoed);
        }
        into_definition(&endpoint, &value, Some(id))
    }

    /// Calls `DELETE {project}/api-endpoints/{id}`.
    pub async fn delete(&self, id: EndpointId) -> Result<(), ApifoxApiError> {
        let endpoint = format!("DELETE /api-endpoints/{}", id.as_u64());
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
    id: Option<EndpointId>,
) -> Result<EndpointDefinition, ApifoxApiError> {
    let mut def = normalize_endpoint(value).map_err(|e| ApifoxApiError::Malformed {
        endpoint: endpoint.into(),
        source: e,
    })?;
    if def.id.is_none() {
        def.id = id;
    }
    Ok(def)
}
