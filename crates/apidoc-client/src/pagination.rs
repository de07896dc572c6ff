//! Cursor pagination for listing routes.
//!
//! Listings answer `{"items": [...], "nextCursor": "..." | null}`. The
//! cursor is opaque: it is only ever echoed back on the next request.

use serde::{Deserialize, Serialize};

/// Opaque continuation token issued by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(pub String);

impl PageCursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// `None` on the last page.
    #[serde(default)]
    pub next_cursor: Option<PageCursor>,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_none()
    }
}

/// Listing filter shared by endpoint routes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListScope {
    pub folder_id: Option<apidoc_core::FolderId>,
    pub tag: Option<String>,
}

impl ListScope {
    pub fn all() -> Self {
        Self::default()
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(folder) = self.folder_id {
            pairs.push(("folderId", folder.as_u64().to_string()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("tag", tag.clone()));
        }
        pairs
    }
}
