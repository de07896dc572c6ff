//! Typed client for endpoint folders.
//!
//! Folders are a pass-through resource: no validation beyond a non-empty
//! name is applied on this path.

use apidoc_core::FolderId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApifoxApiError;
use crate::pagination::{Page, PageCursor};
use crate::transport::Transport;

const RESOURCE: &str = "api-folders";

/// Folder as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default)]
    pub parent_id: FolderId,
    #[serde(default)]
    pub description: String,
}

/// Request to create a folder.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent_id: FolderId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Client for folder resources.
#[derive(Debug, Clone)]
pub struct FolderClient {
    transport: Transport,
}

impl FolderClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// All folders, following listing cursors.
    pub async fn list(&self) -> Result<Vec<Folder>, ApifoxApiError> {
        let mut out = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        loop {
            let mut query = vec![("limit", "100".to_string())];
            if let Some(c) = &cursor {
                query.push(("cursor", c.as_str().to_string()));
            }
            let page: Page<Folder> = self
                .transport
                .get_json("GET /api-folders", RESOURCE, &query)
                .await?;
            out.extend(page.items);
            match page.next_cursor {
                Some(next) if cursor.as_ref() != Some(&next) => cursor = Some(next),
                _ => break,
            }
        }
        Ok(out)
    }

    /// Calls `POST {project}/api-folders`.
    pub async fn create(&self, req: &CreateFolderRequest) -> Result<Folder, ApifoxApiError> {
        let endpoint = "POST /api-folders";
        let value = self
            .transport
            .send(reqwest::Method::POST, endpoint, RESOURCE, Some(req))
            .await?;
        serde_json::from_value(value).map_err(|e| ApifoxApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Calls `DELETE {project}/api-folders/{id}`.
    pub async fn delete(&self, id: FolderId) -> Result<(), ApifoxApiError> {
        let endpoint = format!("DELETE /api-folders/{}", id.as_u64());
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
