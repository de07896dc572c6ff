//! # apidoc-core — Foundational Types for the API Documentation Toolkit
//!
//! Every other crate in the workspace depends on this one. It has no
//! internal crate dependencies: only `serde`, `serde_json` and `thiserror`
//! from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Typed model at the boundary.** Callers hand in untyped JSON payloads;
//!    [`normalize`] turns them into [`EndpointDefinition`] / [`SchemaNode`]
//!    values or fails with a [`StructuralError`]. Nothing downstream ever
//!    inspects raw `serde_json::Value` shapes.
//!
//! 2. **Newtype wrappers for identifiers.** You cannot pass a [`SchemaId`]
//!    where an [`EndpointId`] is expected.
//!
//! 3. **Structural vs. semantic.** This crate only answers "is the payload
//!    well-formed?". Documentation-quality rules live in `apidoc-rules`.

pub mod error;
pub mod identity;
pub mod model;
pub mod normalize;
pub mod schema;

// Re-export primary types at crate root for ergonomic imports.
pub use error::StructuralError;
pub use identity::{EndpointId, FolderId, ProjectId, SchemaId};
pub use model::{
    EndpointDefinition, EndpointRef, EndpointStatus, EndpointSummary, HttpMethod, Parameter,
    ParameterLocation, SchemaDefinition, SchemaSummary, StatusCode,
};
pub use normalize::{
    normalize_endpoint, normalize_schema, normalize_schema_definition, MAX_SCHEMA_NODES,
};
pub use schema::{PrimitiveType, SchemaKind, SchemaNode};
