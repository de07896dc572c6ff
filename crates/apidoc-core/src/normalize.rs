//! # Payload Normalizer
//!
//! Turns caller-supplied JSON payloads (and resources fetched back from the
//! documentation service) into typed [`EndpointDefinition`],
//! [`SchemaDefinition`] and [`SchemaNode`] values.
//!
//! The normalizer is a pure function of its input. It is responsible only
//! for *structural* coercion:
//!
//! - required keys present, values of the right JSON kind;
//! - defaults for optional fields (`status`, `folder_id`, `tags`, ...);
//! - whitespace trimming of titles, descriptions, names and tags;
//! - inlining of `#/components/schemas/<Name>` references, rejecting
//!   unresolved and cyclic references.
//!
//! It never judges documentation quality: an empty description is accepted
//! here and reported later by the rule engine.
//!
//! Keys are accepted in both snake_case (tool payloads) and camelCase
//! (service wire form), so the same code path normalizes both.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::error::StructuralError;
use crate::identity::{EndpointId, FolderId, SchemaId};
use crate::model::{
    EndpointDefinition, EndpointStatus, HttpMethod, Parameter, ParameterLocation,
    SchemaDefinition, StatusCode,
};
use crate::schema::{PrimitiveType, SchemaKind, SchemaNode};

/// Reference prefixes resolved against the payload's component map.
const REF_PREFIXES: [&str; 2] = ["#/components/schemas/", "#/definitions/"];

/// Normalize an endpoint payload.
///
/// Required keys: `title`, `method`, `path`. Everything else has a default.
/// Responses come from `responses` (status → schema); when absent,
/// `response_schema` is accepted either as such a mapping or, if its keys are
/// not status codes, as the single 200 response (with `response_example`
/// attached when the schema carries no example of its own).
pub fn normalize_endpoint(payload: &Value) -> Result<EndpointDefinition, StructuralError> {
    let root = Fields::new(payload, "$")?;
    let mut resolver = SchemaResolver::new(components_of(&root)?);

    let id = root.opt_u64(&["id"])?.map(EndpointId);
    let title = root.req_string(&["title", "summary"])?;
    let description = root.opt_string(&["description"])?.unwrap_or_default();

    let (method_key, method_raw) = root.req_str_with_key(&["method"])?;
    let method: HttpMethod = method_raw
        .parse()
        .map_err(|reason| root.invalid(method_key, reason))?;

    let (path_key, path_raw) = root.req_str_with_key(&["path"])?;
    let path = normalize_route(path_raw).ok_or_else(|| root.invalid(path_key, "path is empty"))?;

    let status = match root.opt_str_with_key(&["status"])? {
        Some((key, raw)) => EndpointStatus::parse(raw)
            .ok_or_else(|| root.invalid(key, format!("unknown endpoint status \"{raw}\"")))?,
        None => EndpointStatus::default(),
    };

    let folder_id = FolderId(root.opt_u64(&["folder_id", "folderId"])?.unwrap_or(0));
    let tags = root.opt_string_set(&["tags"])?;
    let parameters = normalize_parameters(&root)?;

    let request_body_schema = match root.get(&["request_body_schema", "requestBodySchema"]) {
        Some((key, value)) => {
            let mut node = resolver.node(value, &root.child(key))?;
            if node.example.is_none() {
                node.example = root.opt_example(&["request_body_example", "requestBodyExample"]);
            }
            Some(node)
        }
        None => None,
    };

    let response_schema = normalize_responses(&root, &mut resolver)?;

    Ok(EndpointDefinition {
        id,
        title,
        description,
        method,
        path,
        status,
        folder_id,
        tags,
        parameters,
        request_body_schema,
        response_schema,
    })
}

/// Normalize a data-schema payload: `name` plus a schema under `schema`
/// (alias `jsonSchema`), or the schema keys inlined at the top level.
pub fn normalize_schema_definition(payload: &Value) -> Result<SchemaDefinition, StructuralError> {
    let root = Fields::new(payload, "$")?;
    let mut resolver = SchemaResolver::new(components_of(&root)?);

    let id = root.opt_u64(&["id"])?.map(SchemaId);
    let name = root.req_string(&["name"])?;
    let description = root.opt_string(&["description"])?.unwrap_or_default();
    let folder_id = FolderId(root.opt_u64(&["folder_id", "folderId"])?.unwrap_or(0));

    let mut schema = match root.get(&["schema", "jsonSchema"]) {
        Some((key, value)) => resolver.node(value, &root.child(key))?,
        None => resolver.node(payload, "$")?,
    };
    if schema.description.is_none() && !description.is_empty() {
        schema.description = Some(description.clone());
    }

    Ok(SchemaDefinition {
        id,
        name,
        description,
        folder_id,
        schema,
    })
}

/// Normalize a standalone schema node. `$ref`s cannot be resolved without a
/// component map and are rejected as unresolved.
pub fn normalize_schema(value: &Value) -> Result<SchemaNode, StructuralError> {
    SchemaResolver::new(None).node(value, "$")
}

/// Trim a route and give it a leading slash. `None` if nothing remains.
fn normalize_route(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}

fn components_of<'a>(root: &Fields<'a>) -> Result<Option<&'a Map<String, Value>>, StructuralError> {
    let Some((key, components)) = root.get(&["components"]) else {
        return Ok(None);
    };
    let components = Fields::new(components, &root.child(key))?;
    match components.get(&["schemas"]) {
        Some((key, schemas)) => schemas
            .as_object()
            .map(Some)
            .ok_or_else(|| wrong_kind(&components.child(key), "object", schemas)),
        None => Ok(None),
    }
}

fn normalize_parameters(root: &Fields<'_>) -> Result<Vec<Parameter>, StructuralError> {
    let mut out = Vec::new();

    if let Some((key, list)) = root.get(&["parameters"]) {
        for (index, item) in array_items(list, &root.child(key))? {
            let path = format!("{}[{index}]", root.child(key));
            let fields = Fields::new(item, &path)?;
            let (loc_key, loc_raw) = fields.req_str_with_key(&["in", "location"])?;
            let location = ParameterLocation::parse(loc_raw).ok_or_else(|| {
                fields.invalid(loc_key, format!("unknown parameter location \"{loc_raw}\""))
            })?;
            out.push(normalize_parameter(&fields, location)?);
        }
    }

    // The grouped form used by the tool surface.
    let grouped = [
        ("query_params", "queryParams", ParameterLocation::Query),
        ("path_params", "pathParams", ParameterLocation::Path),
        ("header_params", "headerParams", ParameterLocation::Header),
    ];
    for (snake, camel, location) in grouped {
        if let Some((key, list)) = root.get(&[snake, camel]) {
            for (index, item) in array_items(list, &root.child(key))? {
                let path = format!("{}[{index}]", root.child(key));
                let fields = Fields::new(item, &path)?;
                out.push(normalize_parameter(&fields, location)?);
            }
        }
    }

    Ok(out)
}

fn normalize_parameter(
    fields: &Fields<'_>,
    location: ParameterLocation,
) -> Result<Parameter, StructuralError> {
    let name = fields.req_string(&["name"])?;
    if name.is_empty() {
        return Err(fields.invalid("name", "parameter name is empty"));
    }

    // Accept both `"type": "integer"` and `"schema": {"type": "integer"}`.
    let type_name = match fields.opt_str_with_key(&["type"])? {
        Some((key, raw)) => Some((fields.child(key), raw)),
        None => match fields.get(&["schema"]) {
            Some((key, schema)) => {
                let nested = Fields::new(schema, &fields.child(key))?;
                nested
                    .opt_str_with_key(&["type"])?
                    .map(|(k, raw)| (nested.child(k), raw))
            }
            None => None,
        },
    };
    let kind = match type_name {
        Some((path, raw)) => PrimitiveType::parse(raw).ok_or_else(|| StructuralError::InvalidValue {
            path,
            reason: format!("parameter type must be a primitive, got \"{raw}\""),
        })?,
        None => PrimitiveType::String,
    };

    let required = location == ParameterLocation::Path
        || fields.opt_bool(&["required"])?.unwrap_or(false);

    Ok(Parameter {
        name,
        location,
        required,
        description: fields.opt_string(&["description"])?.unwrap_or_default(),
        kind,
        example: fields.opt_example(&["example"]),
    })
}

fn normalize_responses(
    root: &Fields<'_>,
    resolver: &mut SchemaResolver<'_>,
) -> Result<BTreeMap<StatusCode, SchemaNode>, StructuralError> {
    if let Some((key, value)) = root.get(&["responses"]) {
        return status_map(value, &root.child(key), resolver);
    }

    let Some((key, value)) = root.get(&["response_schema", "responseSchema"]) else {
        return Ok(BTreeMap::new());
    };
    let path = root.child(key);
    let map = value
        .as_object()
        .ok_or_else(|| wrong_kind(&path, "object", value))?;

    let keyed_by_status =
        !map.is_empty() && map.keys().all(|k| k.len() == 3 && k.parse::<u16>().is_ok());
    if keyed_by_status {
        return status_map(value, &path, resolver);
    }

    let mut node = resolver.node(value, &path)?;
    if node.example.is_none() {
        node.example = root.opt_example(&["response_example", "responseExample"]);
    }
    Ok(BTreeMap::from([(StatusCode::OK, node)]))
}

fn status_map(
    value: &Value,
    path: &str,
    resolver: &mut SchemaResolver<'_>,
) -> Result<BTreeMap<StatusCode, SchemaNode>, StructuralError> {
    let map = value
        .as_object()
        .ok_or_else(|| wrong_kind(path, "object", value))?;
    let mut out = BTreeMap::new();
    for (code, schema) in map {
        let child = format!("{path}.{code}");
        let status = code
            .trim()
            .parse::<u16>()
            .ok()
            .and_then(StatusCode::new)
            .ok_or_else(|| StructuralError::InvalidValue {
                path: child.clone(),
                reason: format!("\"{code}\" is not an HTTP status code"),
            })?;
        out.insert(status, resolver.node(schema, &child)?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Schema resolution
// ---------------------------------------------------------------------------

/// Upper bound on schema nodes built for one payload, counting every
/// inlined copy of a `$ref` target.
pub const MAX_SCHEMA_NODES: usize = 10_000;

/// Recursive schema normalizer with `$ref` inlining.
///
/// `stack` holds the component names currently being expanded; meeting one
/// of them again means the reference graph has a cycle. `nodes` counts
/// every node built so far, shared across all schemas of one payload.
struct SchemaResolver<'a> {
    components: Option<&'a Map<String, Value>>,
    stack: Vec<String>,
    nodes: usize,
}

impl<'a> SchemaResolver<'a> {
    fn new(components: Option<&'a Map<String, Value>>) -> Self {
        Self {
            components,
            stack: Vec::new(),
            nodes: 0,
        }
    }

    fn node(&mut self, value: &Value, path: &str) -> Result<SchemaNode, StructuralError> {
        self.nodes += 1;
        if self.nodes > MAX_SCHEMA_NODES {
            return Err(StructuralError::TooLarge {
                path: path.to_string(),
                limit: MAX_SCHEMA_NODES,
            });
        }
        let fields = Fields::new(value, path)?;

        if let Some((key, reference)) = fields.get(&["$ref"]) {
            let reference = reference
                .as_str()
                .ok_or_else(|| wrong_kind(&fields.child(key), "string", reference))?;
            let mut node = self.resolve(reference, path)?;
            // Sibling keys next to a `$ref` override the referenced node.
            if let Some(description) = fields.opt_string(&["description"])? {
                node.description = non_empty(description);
            }
            if let Some(example) = fields.opt_example(&["example"]) {
                node.example = Some(example);
            }
            return Ok(node);
        }

        let kind = match schema_type(&fields)? {
            SchemaType::Object => {
                let mut properties = BTreeMap::new();
                if let Some((key, props)) = fields.get(&["properties"]) {
                    let props_path = fields.child(key);
                    let map = props
                        .as_object()
                        .ok_or_else(|| wrong_kind(&props_path, "object", props))?;
                    for (name, child) in map {
                        let child_path = format!("{props_path}.{name}");
                        properties.insert(name.trim().to_string(), self.node(child, &child_path)?);
                    }
                }
                let required = match fields.get(&["required"]) {
                    Some((key, list)) => array_items(list, &fields.child(key))?
                        .map(|(index, item)| {
                            item.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
                                wrong_kind(&format!("{}[{index}]", fields.child(key)), "string", item)
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    None => Vec::new(),
                };
                SchemaKind::Object {
                    properties,
                    required,
                }
            }
            SchemaType::Array => {
                let (key, items) = fields
                    .get(&["items"])
                    .ok_or_else(|| fields.missing("items"))?;
                SchemaKind::Array {
                    items: Box::new(self.node(items, &fields.child(key))?),
                }
            }
            SchemaType::Primitive(ty) => SchemaKind::Primitive(ty),
        };

        Ok(SchemaNode {
            kind,
            description: fields.opt_string(&["description"])?.and_then(non_empty),
            example: fields.opt_example(&["example"]),
        })
    }

    fn resolve(&mut self, reference: &str, path: &str) -> Result<SchemaNode, StructuralError> {
        let unresolved = || StructuralError::UnresolvedReference {
            path: path.to_string(),
            reference: reference.to_string(),
        };
        let name = REF_PREFIXES
            .iter()
            .find_map(|prefix| reference.strip_prefix(prefix))
            .ok_or_else(unresolved)?;
        let target = self
            .components
            .and_then(|components| components.get(name))
            .ok_or_else(unresolved)?;

        if self.stack.iter().any(|open| open == name) {
            return Err(StructuralError::CyclicReference {
                path: path.to_string(),
                reference: reference.to_string(),
            });
        }

        self.stack.push(name.to_string());
        let result = self.node(target, &format!("$.components.schemas.{name}"));
        self.stack.pop();
        result
    }
}

enum SchemaType {
    Object,
    Array,
    Primitive(PrimitiveType),
}

/// Read `type`, accepting the OpenAPI 3.1 list form (`["string", "null"]`,
/// first non-null wins) and inferring object/array from `properties`/`items`
/// when the key is absent.
fn schema_type(fields: &Fields<'_>) -> Result<SchemaType, StructuralError> {
    let raw = match fields.get(&["type"]) {
        Some((key, Value::String(s))) => (fields.child(key), s.trim().to_string()),
        Some((key, Value::Array(list))) => {
            let names: Vec<&str> = list.iter().filter_map(Value::as_str).collect();
            let picked = names
                .iter()
                .find(|n| **n != "null")
                .or_else(|| names.first())
                .ok_or_else(|| fields.invalid(key, "type list is empty"))?;
            (fields.child(key), picked.to_string())
        }
        Some((key, other)) => return Err(wrong_kind(&fields.child(key), "string", other)),
        None if fields.get(&["properties"]).is_some() => return Ok(SchemaType::Object),
        None if fields.get(&["items"]).is_some() => return Ok(SchemaType::Array),
        None => return Err(fields.missing("type")),
    };

    match raw.1.as_str() {
        "object" => Ok(SchemaType::Object),
        "array" => Ok(SchemaType::Array),
        other => PrimitiveType::parse(other)
            .map(SchemaType::Primitive)
            .ok_or_else(|| StructuralError::InvalidValue {
                path: raw.0,
                reason: format!("unknown schema type \"{other}\""),
            }),
    }
}

// ---------------------------------------------------------------------------
// Field access helpers
// ---------------------------------------------------------------------------

/// A JSON object plus its path, with typed accessors that produce
/// path-carrying structural errors. Every accessor takes a list of accepted
/// key spellings; the first one present wins.
struct Fields<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Fields<'a> {
    fn new(value: &'a Value, path: &str) -> Result<Self, StructuralError> {
        let map = value
            .as_object()
            .ok_or_else(|| wrong_kind(path, "object", value))?;
        Ok(Self {
            map,
            path: path.to_string(),
        })
    }

    fn child(&self, key: &str) -> String {
        format!("{}.{key}", self.path)
    }

    fn missing(&self, key: &str) -> StructuralError {
        StructuralError::MissingKey {
            path: self.path.clone(),
            key: key.to_string(),
        }
    }

    fn invalid(&self, key: &str, reason: impl Into<String>) -> StructuralError {
        StructuralError::InvalidValue {
            path: self.child(key),
            reason: reason.into(),
        }
    }

    /// First present, non-null key.
    fn get(&self, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
        keys.iter()
            .find_map(|k| self.map.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
    }

    fn opt_str_with_key(
        &self,
        keys: &[&'static str],
    ) -> Result<Option<(&'static str, &'a str)>, StructuralError> {
        match self.get(keys) {
            Some((key, Value::String(s))) => Ok(Some((key, s.as_str()))),
            Some((key, other)) => Err(wrong_kind(&self.child(key), "string", other)),
            None => Ok(None),
        }
    }

    fn req_str_with_key(
        &self,
        keys: &[&'static str],
    ) -> Result<(&'static str, &'a str), StructuralError> {
        self.opt_str_with_key(keys)?
            .ok_or_else(|| self.missing(keys[0]))
    }

    fn opt_string(&self, keys: &[&'static str]) -> Result<Option<String>, StructuralError> {
        Ok(self
            .opt_str_with_key(keys)?
            .map(|(_, s)| s.trim().to_string()))
    }

    fn req_string(&self, keys: &[&'static str]) -> Result<String, StructuralError> {
        Ok(self.req_str_with_key(keys)?.1.trim().to_string())
    }

    fn opt_bool(&self, keys: &[&'static str]) -> Result<Option<bool>, StructuralError> {
        match self.get(keys) {
            Some((_, Value::Bool(b))) => Ok(Some(*b)),
            Some((key, other)) => Err(wrong_kind(&self.child(key), "boolean", other)),
            None => Ok(None),
        }
    }

    /// Non-negative integer, also accepted as a numeric string since some
    /// service responses quote their ids.
    fn opt_u64(&self, keys: &[&'static str]) -> Result<Option<u64>, StructuralError> {
        match self.get(keys) {
            Some((key, Value::Number(n))) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.invalid(key, format!("expected a non-negative integer, got {n}"))),
            Some((key, Value::String(s))) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(key, format!("expected a non-negative integer, got \"{s}\""))),
            Some((key, other)) => Err(wrong_kind(&self.child(key), "integer", other)),
            None => Ok(None),
        }
    }

    fn opt_string_set(&self, keys: &[&'static str]) -> Result<BTreeSet<String>, StructuralError> {
        let Some((key, list)) = self.get(keys) else {
            return Ok(BTreeSet::new());
        };
        let path = self.child(key);
        array_items(list, &path)?
            .filter_map(|(index, item)| match item {
                Value::String(s) => {
                    let trimmed = s.trim();
                    (!trimmed.is_empty()).then(|| Ok(trimmed.to_string()))
                }
                other => Some(Err(wrong_kind(&format!("{path}[{index}]"), "string", other))),
            })
            .collect()
    }

    fn opt_example(&self, keys: &[&'static str]) -> Option<Value> {
        self.get(keys).map(|(_, v)| v.clone())
    }
}

fn array_items<'a>(
    value: &'a Value,
    path: &str,
) -> Result<impl Iterator<Item = (usize, &'a Value)>, StructuralError> {
    value
        .as_array()
        .map(|list| list.iter().enumerate())
        .ok_or_else(|| wrong_kind(path, "array", value))
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn wrong_kind(path: &str, expected: &'static str, found: &Value) -> StructuralError {
    StructuralError::WrongKind {
        path: path.to_string(),
        expected,
        found: kind_name(found),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_payload() -> Value {
        json!({
            "title": "  获取用户信息 ",
            "description": "根据用户ID获取用户详细信息",
            "method": "get",
            "path": "users/{id}",
            "tags": ["用户管理", " 用户管理 ", ""],
            "path_params": [{"name": "id", "type": "integer", "description": "用户ID", "example": 10001}],
            "responses": {
                "200": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer", "description": "用户唯一标识", "example": 10001},
                        "name": {"type": "string", "description": "用户名", "example": "zhangsan"}
                    },
                    "required": ["id"]
                }
            }
        })
    }

    #[test]
    fn normalizes_and_applies_defaults() {
        let def = normalize_endpoint(&user_payload()).unwrap();
        assert_eq!(def.title, "获取用户信息");
        assert_eq!(def.method, HttpMethod::Get);
        assert_eq!(def.path, "/users/{id}");
        assert_eq!(def.status, EndpointStatus::Developing);
        assert_eq!(def.folder_id, FolderId::ROOT);
        assert_eq!(def.tags.len(), 1);
        assert!(def.id.is_none());
        assert_eq!(def.parameters.len(), 1);
        assert!(def.parameters[0].required);
        assert_eq!(def.parameters[0].kind, PrimitiveType::Integer);

        let ok = &def.response_schema[&StatusCode::OK];
        let props = ok.properties().unwrap();
        assert_eq!(props["id"].description.as_deref(), Some("用户唯一标识"));
    }

    #[test]
    fn missing_title_is_structural() {
        let mut payload = user_payload();
        payload.as_object_mut().unwrap().remove("title");
        let err = normalize_endpoint(&payload).unwrap_err();
        assert_eq!(
            err,
            StructuralError::MissingKey {
                path: "$".into(),
                key: "title".into()
            }
        );
    }

    #[test]
    fn empty_description_is_not_structural() {
        let mut payload = user_payload();
        payload["description"] = json!("   ");
        let def = normalize_endpoint(&payload).unwrap();
        assert_eq!(def.description, "");
    }

    #[test]
    fn wrong_kind_reports_path() {
        let mut payload = user_payload();
        payload["responses"]["200"]["properties"]["id"] = json!("integer");
        let err = normalize_endpoint(&payload).unwrap_err();
        assert_eq!(err.path(), "$.responses.200.properties.id");
        assert!(matches!(err, StructuralError::WrongKind { expected: "object", found: "string", .. }));
    }

    #[test]
    fn unknown_method_is_rejected() {
        let mut payload = user_payload();
        payload["method"] = json!("FETCH");
        let err = normalize_endpoint(&payload).unwrap_err();
        assert!(matches!(err, StructuralError::InvalidValue { ref path, .. } if path == "$.method"));
    }

    #[test]
    fn response_schema_shorthand_becomes_200_with_example() {
        let payload = json!({
            "title": "创建订单",
            "method": "POST",
            "path": "/orders",
            "response_schema": {
                "type": "object",
                "properties": {"orderId": {"type": "integer", "description": "订单ID"}}
            },
            "response_example": {"orderId": 10001}
        });
        let def = normalize_endpoint(&payload).unwrap();
        let ok = &def.response_schema[&StatusCode::OK];
        assert_eq!(ok.example, Some(json!({"orderId": 10001})));
    }

    #[test]
    fn response_schema_keyed_by_status_is_a_mapping() {
        let payload = json!({
            "title": "删除订单",
            "method": "DELETE",
            "path": "/orders/{id}",
            "response_schema": {
                "204": {"type": "null", "description": "删除成功"},
                "404": {"type": "string", "example": "订单不存在"}
            }
        });
        let def = normalize_endpoint(&payload).unwrap();
        let codes: Vec<u16> = def.response_schema.keys().map(StatusCode::as_u16).collect();
        assert_eq!(codes, vec![204, 404]);
    }

    #[test]
    fn refs_are_inlined_with_sibling_override() {
        let payload = json!({
            "title": "获取订单",
            "method": "GET",
            "path": "/orders/{id}",
            "components": {"schemas": {
                "Order": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "integer", "description": "订单ID", "example": 1},
                        "buyer": {"$ref": "#/components/schemas/User", "description": "下单用户"}
                    }
                },
                "User": {
                    "type": "object",
                    "description": "用户",
                    "properties": {"name": {"type": "string", "description": "姓名", "example": "李四"}}
                }
            }},
            "responses": {"200": {"$ref": "#/components/schemas/Order"}}
        });
        let def = normalize_endpoint(&payload).unwrap();
        let order = &def.response_schema[&StatusCode::OK];
        let buyer = &order.properties().unwrap()["buyer"];
        assert_eq!(buyer.description.as_deref(), Some("下单用户"));
        assert!(buyer.properties().unwrap().contains_key("name"));
    }

    #[test]
    fn cyclic_refs_are_rejected() {
        let payload = json!({
            "title": "获取分类树",
            "method": "GET",
            "path": "/categories",
            "components": {"schemas": {
                "Category": {
                    "type": "object",
                    "properties": {
                        "children": {"type": "array", "items": {"$ref": "#/components/schemas/Category"}}
                    }
                }
            }},
            "responses": {"200": {"$ref": "#/components/schemas/Category"}}
        });
        let err = normalize_endpoint(&payload).unwrap_err();
        assert!(matches!(err, StructuralError::CyclicReference { .. }), "{err}");
    }

    #[test]
    fn exponential_ref_fan_out_hits_the_node_budget() {
        // Each level references the next one twice: 2^30 leaves if inlined.
        let mut schemas = serde_json::Map::new();
        for level in 0..30 {
            let next = json!({"$ref": format!("#/components/schemas/L{}", level + 1)});
            schemas.insert(
                format!("L{level}"),
                json!({"type": "object", "properties": {"left": next.clone(), "right": next}}),
            );
        }
        schemas.insert("L30".into(), json!({"type": "string", "example": "leaf"}));
        let payload = json!({
            "title": "获取树",
            "method": "GET",
            "path": "/trees",
            "components": {"schemas": schemas},
            "responses": {"200": {"$ref": "#/components/schemas/L0"}}
        });
        let err = normalize_endpoint(&payload).unwrap_err();
        assert!(
            matches!(err, StructuralError::TooLarge { limit: MAX_SCHEMA_NODES, .. }),
            "{err}"
        );
    }

    #[test]
    fn shared_refs_within_budget_are_inlined() {
        let payload = json!({
            "title": "获取订单",
            "method": "GET",
            "path": "/orders/{id}",
            "components": {"schemas": {
                "Money": {"type": "object", "properties": {
                    "amount": {"type": "integer", "example": 100},
                    "currency": {"type": "string", "example": "CNY"}
                }}
            }},
            "responses": {"200": {"type": "object", "properties": {
                "price": {"$ref": "#/components/schemas/Money"},
                "discount": {"$ref": "#/components/schemas/Money"}
            }}}
        });
        let def = normalize_endpoint(&payload).unwrap();
        let props = def.response_schema[&StatusCode::OK].properties().unwrap();
        assert!(props["price"].properties().unwrap().contains_key("amount"));
        assert!(props["discount"].properties().unwrap().contains_key("currency"));
    }

    #[test]
    fn unresolved_ref_is_rejected() {
        let err = normalize_schema(&json!({"$ref": "#/components/schemas/Missing"})).unwrap_err();
        assert!(matches!(err, StructuralError::UnresolvedReference { .. }));
    }

    #[test]
    fn array_without_items_is_missing_key() {
        let err = normalize_schema(&json!({"type": "array", "description": "列表"})).unwrap_err();
        assert_eq!(
            err,
            StructuralError::MissingKey {
                path: "$".into(),
                key: "items".into()
            }
        );
    }

    #[test]
    fn nullable_type_list_picks_non_null() {
        let node = normalize_schema(&json!({"type": ["null", "string"], "example": "a"})).unwrap();
        assert_eq!(node.kind, SchemaKind::Primitive(PrimitiveType::String));
    }

    #[test]
    fn schema_definition_accepts_inline_schema() {
        let def = normalize_schema_definition(&json!({
            "name": " User ",
            "description": "用户模型",
            "type": "object",
            "properties": {"id": {"type": "integer", "description": "ID", "example": 1}}
        }))
        .unwrap();
        assert_eq!(def.name, "User");
        assert_eq!(def.schema.description.as_deref(), Some("用户模型"));
    }

    #[test]
    fn quoted_ids_are_accepted() {
        let mut payload = user_payload();
        payload["id"] = json!("42");
        assert_eq!(normalize_endpoint(&payload).unwrap().id, Some(EndpointId(42)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arbitrary_json() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(|n| json!(n)),
                "[a-z$/#{}]{0,12}".prop_map(Value::String),
            ];
            leaf.prop_recursive(4, 48, 6, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                    prop::collection::btree_map(
                        prop_oneof![
                            Just("type".to_string()),
                            Just("properties".to_string()),
                            Just("items".to_string()),
                            Just("$ref".to_string()),
                            "[a-z]{1,6}",
                        ],
                        inner,
                        0..6
                    )
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
                ]
            })
        }

        proptest! {
            /// The normalizer never panics: arbitrary JSON yields a node or
            /// a structural error.
            #[test]
            fn schema_normalization_never_panics(value in arbitrary_json()) {
                let _ = normalize_schema(&value);
            }

            /// Normalization is a pure function of its input.
            #[test]
            fn schema_normalization_is_deterministic(value in arbitrary_json()) {
                prop_assert_eq!(normalize_schema(&value), normalize_schema(&value));
            }
        }
    }
}
