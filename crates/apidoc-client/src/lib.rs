//! # apidoc-client -- Typed Rust client for the Apifox documentation service
//!
//! Provides typed access to the four resource families a documentation
//! project holds:
//! - **Endpoints** via `api-endpoints`
//! - **Data schemas** via `data-schemas`
//! - **Folders** via `api-folders`
//! - **Tags** via `tags`
//!
//! ## Architecture
//!
//! This crate is the only path through which the toolkit talks to the
//! remote service. Fetched resources are normalized into `apidoc-core`
//! types before they are returned; documentation-quality rules are applied
//! by callers, never here.
//!
//! ## API Path Convention
//!
//! Every route is scoped to the configured project:
//! `{base_url}/v1/projects/{project_id}/{resource}`, with `locale` as a
//! query parameter on every request.

pub mod config;
pub mod endpoints;
pub mod error;
pub mod folders;
pub mod pagination;
pub(crate) mod retry;
pub mod schemas;
pub mod tags;
pub(crate) mod transport;

pub use config::{ApifoxConfig, ConfigError};
pub use error::ApifoxApiError;
pub use folders::{CreateFolderRequest, Folder};
pub use pagination::{ListScope, Page, PageCursor};
pub use tags::Tag;

use std::time::Duration;

use apidoc_core::ProjectId;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};

/// Header carrying the API version the client speaks (`X-Apifox-Api-Version`).
/// Header names are case-insensitive; `http` requires the lower-case form.
pub const API_VERSION_HEADER: &str = "x-apifox-api-version";

/// Top-level client. Holds one sub-client per resource family; all share
/// the same connection pool.
#[derive(Debug, Clone)]
pub struct ApifoxClient {
    project_id: ProjectId,
    endpoints: endpoints::EndpointClient,
    schemas: schemas::SchemaClient,
    folders: folders::FolderClient,
    tags: tags::TagClient,
}

impl ApifoxClient {
    /// Create a new client from configuration.
    pub fn new(config: ApifoxConfig) -> Result<Self, ApifoxApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_token.as_str()))
                .map_err(|_| ApifoxApiError::Config(ConfigError::MissingToken))?,
        );
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            HeaderValue::from_str(&config.api_version).map_err(|_| {
                ApifoxApiError::Config(ConfigError::InvalidValue(
                    "APIFOX_API_VERSION".into(),
                    config.api_version.clone(),
                ))
            })?,
        );

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ApifoxApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let project_root = format!(
            "{}/v1/projects/{}",
            config.base_url.as_str().trim_end_matches('/'),
            config.project_id.as_str()
        );
        let transport = transport::Transport::new(http, project_root, config.locale.clone());

        Ok(Self {
            project_id: config.project_id,
            endpoints: endpoints::EndpointClient::new(transport.clone()),
            schemas: schemas::SchemaClient::new(transport.clone()),
            folders: folders::FolderClient::new(transport.clone()),
            tags: tags::TagClient::new(transport),
        })
    }

    /// The project every call is scoped to.
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Access the endpoint client.
    pub fn endpoints(&self) -> &endpoints::EndpointClient {
        &self.endpoints
    }

    /// Access the data-schema client.
    pub fn schemas(&self) -> &schemas::SchemaClient {
        &self.schemas
    }

    /// Access the folder client.
    pub fn folders(&self) -> &folders::FolderClient {
        &self.folders
    }

    /// Access the tag client.
    pub fn tags(&self) -> &tags::TagClient {
        &self.tags
    }

    /// Reachability probe: a one-item endpoint listing.
    pub async fn probe(&self) -> Result<(), ApifoxApiError> {
        self.endpoints
            .list_page(&ListScope::all(), None, 1)
            .await
            .map(|_| ())
    }
}
