//! # apidoc-tools — Tool Surface
//!
//! One async method per tool an agent can call. Every method takes and
//! returns JSON-compatible values.
//!
//! ## Write Pipeline
//!
//! `create_*` and `update_*` run the payload through:
//!
//! 1. the normalizer (structural errors abort before any network call),
//! 2. the standard error injector (endpoints only),
//! 3. the rule engine (any violation rejects the write, with every
//!    violation listed),
//! 4. the remote client, exactly once.
//!
//! Either the full normalized definition is sent or nothing is.
//!
//! ## Read-Only Checks
//!
//! `check_api_responses` and `audit_all_api_responses` evaluate stored
//! resources as they are. They never inject, never write. The same holds
//! for the project-wide `check_path_naming_convention` and
//! `check_response_consistency`.
//!
//! ## CRUD Generation
//!
//! `generate_crud_apis` builds the five REST endpoints of a resource model,
//! validates all of them up front, then creates each through
//! `create_api_endpoint`.

pub mod config_check;
pub mod consistency;
pub mod crud;
pub mod endpoints;
pub mod error;
pub mod folders;
pub mod schemas;

pub use config_check::{check_apifox_config, ConfigStatus};
pub use consistency::{PathNamingReport, ResponseConsistencyReport};
pub use crud::{crud_payloads, CrudFailure, CrudOperation, CrudOutcome, CrudRequest};
pub use endpoints::EndpointFilter;
pub use error::ToolError;
pub use schemas::SchemaFilter;

use std::sync::Arc;

use apidoc_audit::AuditConfig;
use apidoc_client::ApifoxClient;
use apidoc_rules::RuleEngine;
use serde::Serialize;

/// Result of a delete tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The service confirmed the delete.
    Deleted { resource: String },
    /// `confirm` was not set; nothing was sent.
    ConfirmationRequired { resource: String },
}

/// The tool surface. Cheap to clone; all state is read-only after startup.
#[derive(Debug, Clone)]
pub struct ApiDocTools {
    client: Arc<ApifoxClient>,
    engine: RuleEngine,
    audit: AuditConfig,
}

impl ApiDocTools {
    pub fn new(client: ApifoxClient, engine: RuleEngine, audit: AuditConfig) -> Self {
        Self {
            client: Arc::new(client),
            engine,
            audit,
        }
    }

    pub fn client(&self) -> &ApifoxClient {
        &self.client
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }
}
