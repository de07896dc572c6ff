//! # SchemaNode
//!
//! Recursive description of a data shape used in request and response
//! bodies. The wire form is the JSON Schema subset the documentation
//! service accepts (`type`, `properties`, `required`, `items`,
//! `description`, `example`); references are inlined by the normalizer,
//! so a `SchemaNode` tree is always finite and acyclic.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Primitive type tag of a leaf node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl PrimitiveType {
    /// Return the JSON Schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// Parse a JSON Schema type name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    /// Whether `value` is an instance of this primitive type.
    ///
    /// `integer` accepts only numbers without a fractional part; `number`
    /// accepts any JSON number.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Null => value.is_null(),
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a [`SchemaNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// Named fields. `required` lists field names in declaration order.
    Object {
        properties: BTreeMap<String, SchemaNode>,
        required: Vec<String>,
    },
    /// Homogeneous list.
    Array { items: Box<SchemaNode> },
    /// Leaf value.
    Primitive(PrimitiveType),
}

/// A node in a schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    /// Trimmed, non-empty description, if any.
    pub description: Option<String>,
    /// Example value for this node and everything below it.
    pub example: Option<Value>,
}

impl SchemaNode {
    pub fn primitive(ty: PrimitiveType) -> Self {
        Self {
            kind: SchemaKind::Primitive(ty),
            description: None,
            example: None,
        }
    }

    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaNode)>,
        K: Into<String>,
    {
        Self {
            kind: SchemaKind::Object {
                properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
                required: Vec::new(),
            },
            description: None,
            example: None,
        }
    }

    pub fn array(items: SchemaNode) -> Self {
        Self {
            kind: SchemaKind::Array {
                items: Box::new(items),
            },
            description: None,
            example: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Mark fields as required. Has no effect on non-object nodes.
    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let SchemaKind::Object { required, .. } = &mut self.kind {
            required.extend(names.into_iter().map(Into::into));
        }
        self
    }

    /// Return the named fields of an object node, or `None` for other kinds.
    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaNode>> {
        match &self.kind {
            SchemaKind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// A primitive node or an object without fields.
    pub fn is_leaf(&self) -> bool {
        match &self.kind {
            SchemaKind::Primitive(_) => true,
            SchemaKind::Object { properties, .. } => properties.is_empty(),
            SchemaKind::Array { .. } => false,
        }
    }

    /// JSON Schema type name of this node.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::Object { .. } => "object",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Primitive(ty) => ty.as_str(),
        }
    }

    /// Render the node back into its JSON Schema wire form.
    pub fn to_json(&self) -> Value {
        // Serialization into a `Value` cannot fail: every key is a string.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.type_name())?;
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        match &self.kind {
            SchemaKind::Object {
                properties,
                required,
            } => {
                map.serialize_entry("properties", properties)?;
                if !required.is_empty() {
                    map.serialize_entry("required", required)?;
                }
            }
            SchemaKind::Array { items } => {
                map.serialize_entry("items", items)?;
            }
            SchemaKind::Primitive(_) => {}
        }
        if let Some(example) = &self.example {
            map.serialize_entry("example", example)?;
        }
        map.end()
    }
}
