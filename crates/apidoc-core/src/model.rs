//! # Resource Model
//!
//! Typed representations of the documentation resources this toolkit
//! manages. Definitions are only ever produced by the normalizer (from a
//! caller payload or a fetched remote resource), so every value of these
//! types is structurally valid. Whether it is also *well documented* is the
//! rule engine's question.
//!
//! Serialization produces the camelCase wire form the documentation service
//! accepts on create/update.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::identity::{EndpointId, FolderId, SchemaId};
use crate::schema::{PrimitiveType, SchemaNode};

// ---------------------------------------------------------------------------
// HttpMethod
// ---------------------------------------------------------------------------

/// HTTP method of a documented route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
    ];

    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Methods whose requests carry a body: POST, PUT, PATCH.
    pub fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    /// Parse case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| format!("unknown HTTP method \"{}\"", s.trim()))
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// StatusCode
// ---------------------------------------------------------------------------

/// HTTP status code keying a response schema. Always within 100..=599.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const CONFLICT: StatusCode = StatusCode(409);
    pub const UNPROCESSABLE_ENTITY: StatusCode = StatusCode(422);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const BAD_GATEWAY: StatusCode = StatusCode(502);
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    /// Construct a status code, rejecting values outside 100..=599.
    pub fn new(code: u16) -> Option<Self> {
        (100..=599).contains(&code).then_some(Self(code))
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Lifecycle status of a documented endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    #[default]
    Developing,
    Testing,
    Released,
    Deprecated,
}

impl EndpointStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Developing => "developing",
            Self::Testing => "testing",
            Self::Released => "released",
            Self::Deprecated => "deprecated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "developing" => Some(Self::Developing),
            "testing" => Some(Self::Testing),
            "released" => Some(Self::Released),
            "deprecated" => Some(Self::Deprecated),
            _ => None,
        }
    }
}

/// Where a request parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            "header" => Some(Self::Header),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter
// ---------------------------------------------------------------------------

/// A query, path or header parameter. Path parameters are always required.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    pub description: String,
    #[serde(rename = "type", serialize_with = "serialize_primitive")]
    pub kind: PrimitiveType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

fn serialize_primitive<S: Serializer>(ty: &PrimitiveType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(ty.as_str())
}

// ---------------------------------------------------------------------------
// EndpointDefinition
// ---------------------------------------------------------------------------

/// A fully normalized endpoint definition.
///
/// `id` is `None` until the service has created the resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EndpointId>,
    pub title: String,
    pub description: String,
    pub method: HttpMethod,
    pub path: String,
    pub status: EndpointStatus,
    pub folder_id: FolderId,
    pub tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body_schema: Option<SchemaNode>,
    /// Response schema per status code.
    #[serde(rename = "responses")]
    pub response_schema: BTreeMap<StatusCode, SchemaNode>,
}

impl EndpointDefinition {
    /// Lightweight reference used in violations and audit reports.
    pub fn reference(&self) -> EndpointRef {
        EndpointRef {
            id: self.id,
            method: self.method,
            path: self.path.clone(),
            title: self.title.clone(),
        }
    }
}

/// Identity of an endpoint as cited by violations and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EndpointId>,
    pub method: HttpMethod,
    pub path: String,
    pub title: String,
}

impl std::fmt::Display for EndpointRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        if let Some(id) = self.id {
            write!(f, " ({id})")?;
        }
        Ok(())
    }
}

/// Endpoint as returned by the listing route.
///
/// Fields use `#[serde(default)]` for resilience against schema evolution
/// in the service; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSummary {
    pub id: EndpointId,
    #[serde(default, alias = "name")]
    pub title: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub folder_id: FolderId,
    #[serde(default)]
    pub status: Option<EndpointStatus>,
}

impl EndpointSummary {
    pub fn reference(&self) -> EndpointRef {
        EndpointRef {
            id: Some(self.id),
            method: self.method,
            path: self.path.clone(),
            title: self.title.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaDefinition
// ---------------------------------------------------------------------------

/// A named, reusable data schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<SchemaId>,
    pub name: String,
    pub description: String,
    pub folder_id: FolderId,
    #[serde(rename = "jsonSchema")]
    pub schema: SchemaNode,
}

/// Data schema as returned by the listing route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSummary {
    pub id: SchemaId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub folder_id: FolderId,
}
