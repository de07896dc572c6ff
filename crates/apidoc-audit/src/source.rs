//! Where the auditor reads endpoints from.
//!
//! [`EndpointSource`] is the read-only slice of the remote client the
//! auditor needs. [`ApifoxClient`] implements it; tests use in-memory
//! sources.

use std::future::Future;

use apidoc_client::{ApifoxApiError, ApifoxClient, ListScope, Page, PageCursor};
use apidoc_core::{EndpointDefinition, EndpointId, EndpointSummary};

/// Read-only access to a project's endpoints.
pub trait EndpointSource: Send + Sync {
    /// Fetch one listing page. `cursor` is `None` for the first page.
    fn list_page(
        &self,
        scope: &ListScope,
        cursor: Option<&PageCursor>,
        limit: u32,
    ) -> impl Future<Output = Result<Page<EndpointSummary>, ApifoxApiError>> + Send;

    /// Fetch and normalize one endpoint's full definition.
    fn fetch_endpoint(
        &self,
        id: EndpointId,
    ) -> impl Future<Output = Result<EndpointDefinition, ApifoxApiError>> + Send;
}

impl EndpointSource for ApifoxClient {
    fn list_page(
        &self,
        scope: &ListScope,
        cursor: Option<&PageCursor>,
        limit: u32,
    ) -> impl Future<Output = Result<Page<EndpointSummary>, ApifoxApiError>> + Send {
        self.endpoints().list_page(scope, cursor, limit)
    }

    fn fetch_endpoint(
        &self,
        id: EndpointId,
    ) -> impl Future<Output = Result<EndpointDefinition, ApifoxApiError>> + Send {
        self.endpoints().get(id)
    }
}

/// Lazy, finite, non-restartable sequence of listing pages.
///
/// Each call to [`Pages::next_page`] issues at most one listing request.
/// The sequence ends after the page without a cursor, after the first
/// error, or when the service hands back the cursor it was just given.
pub struct Pages<'a, S> {
    source: &'a S,
    scope: ListScope,
    page_size: u32,
    cursor: Option<PageCursor>,
    fetched: u32,
    done: bool,
}

impl<'a, S: EndpointSource> Pages<'a, S> {
    pub fn new(source: &'a S, scope: ListScope, page_size: u32) -> Self {
        Self {
            source,
            scope,
            page_size,
            cursor: None,
            fetched: 0,
            done: false,
        }
    }

    /// Number of pages fetched so far.
    pub fn fetched(&self) -> u32 {
        self.fetched
    }

    /// The next page, or `None` once the sequence is exhausted.
    pub async fn next_page(&mut self) -> Option<Result<Page<EndpointSummary>, ApifoxApiError>> {
        if self.done {
            return None;
        }

        let result = self
            .source
            .list_page(&self.scope, self.cursor.as_ref(), self.page_size)
            .await;

        match &result {
            Ok(page) => {
                self.fetched += 1;
                match &page.next_cursor {
                    None => self.done = true,
                    Some(next) if self.cursor.as_ref() == Some(next) => {
                        tracing::warn!(
                            cursor = next.as_str(),
                            page = self.fetched,
                            "listing cursor did not advance, ending scan"
                        );
                        self.done = true;
                    }
                    Some(next) => self.cursor = Some(next.clone()),
                }
            }
            Err(_) => self.done = true,
        }
        Some(result)
    }
}
