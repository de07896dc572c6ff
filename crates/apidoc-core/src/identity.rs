//! # Identifier Newtypes
//!
//! The documentation service addresses every resource by a numeric id scoped
//! to a project. Each resource namespace gets its own wrapper so that an
//! endpoint id can never be sent to a schema route by accident.

use serde::{Deserialize, Serialize};

/// Identifier of an API endpoint inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(pub u64);

/// Identifier of a data schema inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(pub u64);

/// Identifier of an endpoint folder. `0` is the project root.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FolderId(pub u64);

/// Identifier of the documentation project all calls are scoped to.
///
/// Kept as an opaque string: the service issues numeric ids today, but the
/// value is only ever echoed back into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl EndpointId {
    /// Access the raw numeric id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl SchemaId {
    /// Access the raw numeric id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FolderId {
    /// The project root folder.
    pub const ROOT: FolderId = FolderId(0);

    /// Access the raw numeric id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "endpoint:{}", self.0)
    }
}

impl std::fmt::Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema:{}", self.0)
    }
}

impl std::fmt::Display for FolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "folder:{}", self.0)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
