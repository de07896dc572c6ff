//! Typed client for the project tag list.
//!
//! Tags are attached to endpoints through the endpoint definition itself;
//! this route only enumerates the tags in use.

use serde::{Deserialize, Serialize};

use crate::error::ApifoxApiError;
use crate::pagination::{Page, PageCursor};
use crate::transport::Transport;

/// Tag as returned by `GET {project}/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    /// Number of endpoints carrying the tag, when the service reports it.
    #[serde(default)]
    pub endpoint_count: Option<u64>,
}

/// Client for the tag listing.
#[derive(Debug, Clone)]
pub struct TagClient {
    transport: Transport,
}

impl TagClient {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// All tags, following listing cursors.
    pub async fn list(&self) -> Result<Vec<Tag>, ApifoxApiError> {
        let mut out = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        loop {
            let mut query = vec![("limit", "100".to_string())];
            if let Some(c) = &cursor {
                query.push(("cursor", c.as_str().to_string()));
            }
            let page: Page<Tag> = self.transport.get_json("GET /tags", "tags", &query).await?;
            out.extend(page.items);
            match page.next_cursor {
                Some(next) if cursor.as_ref() != Some(&next) => cursor = Some(next),
                _ => break,
            }
        }
        Ok(out)
    }
}
