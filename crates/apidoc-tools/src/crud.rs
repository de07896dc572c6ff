//! # CRUD Generation
//!
//! `generate_crud_apis` turns one resource model into the standard REST
//! endpoints:
//!
//! | operation | method   | route              |
//! |-----------|----------|--------------------|
//! | list      | `GET`    | `{base}`           |
//! | get       | `GET`    | `{base}/{id}`      |
//! | create    | `POST`   | `{base}`           |
//! | update    | `PUT`    | `{base}/{id}`      |
//! | delete    | `DELETE` | `{base}/{id}`      |
//!
//! Every payload carries the resource model, its create-request variant and
//! the paginated list shape as shared components referenced by `$ref`.
//! All payloads are validated before the first write; any violation rejects
//! the whole batch. Writes then go through `create_api_endpoint` one by one.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use apidoc_core::{normalize_endpoint, EndpointRef, FolderId, PrimitiveType};

use crate::error::ToolError;
use crate::ApiDocTools;

/// One generated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 5] =
        [Self::List, Self::Get, Self::Create, Self::Update, Self::Delete];
}

/// Arguments of `generate_crud_apis`.
#[derive(Debug, Clone, Deserialize)]
pub struct CrudRequest {
    /// English resource name, e.g. `user`. Names the shared components.
    pub resource_name: String,
    /// Display name used in titles, e.g. `用户`.
    pub resource_name_cn: String,
    pub base_path: String,
    /// Object schema of the resource. Every property needs a description.
    pub model_schema: Value,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_id_type")]
    pub id_type: String,
    /// Defaults to every operation.
    #[serde(default)]
    pub operations: Option<Vec<CrudOperation>>,
    /// Defaults to `["{resource_name_cn}管理"]`.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub folder_id: FolderId,
    /// Prepended to every generated description.
    #[serde(default)]
    pub description_prefix: Option<String>,
}

fn default_id_field() -> String {
    "id".into()
}

fn default_id_type() -> String {
    "integer".into()
}

/// An endpoint that could not be created, with the tool error body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrudFailure {
    pub endpoint: String,
    pub error: Value,
}

/// Result of `generate_crud_apis`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrudOutcome {
    pub created: Vec<EndpointRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<CrudFailure>,
}

impl ApiDocTools {
    /// `generate_crud_apis`
    pub async fn generate_crud_apis(&self, req: &CrudRequest) -> Result<CrudOutcome, ToolError> {
        let payloads = crud_payloads(req)?;
        tracing::info!(
            resource = %req.resource_name,
            base_path = %req.base_path,
            endpoints = payloads.len(),
            "generate_crud_apis"
        );

        let mut violations = Vec::new();
        for payload in &payloads {
            let mut def = normalize_endpoint(payload)?;
            def.id = None;
            match self.prepare_endpoint(def) {
                Ok(_) => {}
                Err(ToolError::Rejected { violations: found }) => violations.extend(found),
                Err(other) => return Err(other),
            }
        }
        if !violations.is_empty() {
            return Err(ToolError::Rejected { violations });
        }

        let mut outcome = CrudOutcome {
            created: Vec::new(),
            failed: Vec::new(),
        };
        for payload in &payloads {
            match self.create_api_endpoint(payload).await {
                Ok(def) => outcome.created.push(def.reference()),
                Err(e) => {
                    let endpoint = format!(
                        "{} {}",
                        payload["method"].as_str().unwrap_or_default(),
                        payload["path"].as_str().unwrap_or_default()
                    );
                    tracing::warn!(endpoint = %endpoint, error = %e, "crud endpoint not created");
                    outcome.failed.push(CrudFailure {
                        endpoint,
                        error: e.to_body(),
                    });
                }
            }
        }
        Ok(outcome)
    }
}

/// Build the endpoint payloads for `req`, in [`CrudOperation::ALL`] order.
pub fn crud_payloads(req: &CrudRequest) -> Result<Vec<Value>, ToolError> {
    let resource = req.resource_name.trim();
    let cn = req.resource_name_cn.trim();
    let base = req.base_path.trim().trim_end_matches('/');
    let id_field = req.id_field.trim();
    if resource.is_empty() || cn.is_empty() || base.is_empty() || id_field.is_empty() {
        return Err(ToolError::InvalidArgument(
            "resource_name, resource_name_cn, base_path and id_field must not be empty".into(),
        ));
    }
    let id_type = PrimitiveType::parse(req.id_type.trim()).ok_or_else(|| {
        ToolError::InvalidArgument(format!("id_type \"{}\" is not a primitive type", req.id_type))
    })?;

    let properties = req
        .model_schema
        .get("properties")
        .and_then(Value::as_object)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ToolError::InvalidArgument("model_schema must define properties".into()))?;
    let undescribed: Vec<&str> = properties
        .iter()
        .filter(|(_, prop)| {
            prop.get("description")
                .and_then(Value::as_str)
                .map_or(true, |d| d.trim().is_empty())
        })
        .map(|(name, _)| name.as_str())
        .collect();
    if !undescribed.is_empty() {
        return Err(ToolError::InvalidArgument(format!(
            "model_schema fields without description: {}",
            undescribed.join(", ")
        )));
    }

    let model = capitalize(resource);
    let create_name = format!("Create{model}Request");
    let list_name = format!("{model}ListResponse");
    let item_example = item_example(properties, id_field);
    let create_example: Map<String, Value> = item_example
        .iter()
        .filter(|(k, _)| k.as_str() != id_field)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let required: Vec<Value> = req
        .model_schema
        .get("required")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter(|r| r.as_str() != Some(id_field))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let create_properties: Map<String, Value> = properties
        .iter()
        .filter(|(k, _)| k.as_str() != id_field)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut schemas = Map::new();
    schemas.insert(model.clone(), req.model_schema.clone());
    schemas.insert(
        create_name.clone(),
        json!({
            "type": "object",
            "description": format!("创建{cn}请求体"),
            "properties": create_properties,
            "required": required
        }),
    );
    schemas.insert(
        list_name.clone(),
        json!({
            "type": "object",
            "description": format!("{cn}列表响应"),
            "properties": {
                "items": {
                    "type": "array",
                    "description": format!("{cn}列表"),
                    "items": {"$ref": format!("#/components/schemas/{model}")}
                },
                "total": {"type": "integer", "description": "总数量"},
                "page": {"type": "integer", "description": "当前页码"},
                "page_size": {"type": "integer", "description": "每页数量"}
            },
            "required": ["items", "total"]
        }),
    );
    let components = json!({ "schemas": schemas });

    let tags = req
        .tags
        .clone()
        .unwrap_or_else(|| vec![format!("{cn}管理")]);
    let describe = |text: String| match req.description_prefix.as_deref().map(str::trim) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}\n\n{text}"),
        _ => text,
    };
    let schema_ref = |name: &str, example: Value| {
        json!({"$ref": format!("#/components/schemas/{name}"), "example": example})
    };
    let detail_path = format!("{base}/{{{id_field}}}");
    let id_param = json!([{
        "name": id_field,
        "type": id_type.as_str(),
        "description": format!("{cn}ID"),
        "example": id_example(id_type),
    }]);
    let item = Value::Object(item_example);
    let create_body = schema_ref(&create_name, Value::Object(create_example));

    let mut operations = req
        .operations
        .clone()
        .unwrap_or_else(|| CrudOperation::ALL.to_vec());
    operations.sort();
    operations.dedup();

    let mut payloads = Vec::new();
    for op in operations {
        let mut payload = match op {
            CrudOperation::List => json!({
                "title": format!("获取{cn}列表"),
                "description": describe(format!("获取{cn}列表，支持分页")),
                "method": "GET",
                "path": base,
                "query_params": [
                    {"name": "page", "type": "integer", "description": "页码", "example": 1},
                    {"name": "page_size", "type": "integer", "description": "每页数量", "example": 20}
                ],
                "responses": {"200": schema_ref(&list_name, json!({
                    "items": [item.clone()],
                    "total": 100,
                    "page": 1,
                    "page_size": 20
                }))}
            }),
            CrudOperation::Get => json!({
                "title": format!("获取{cn}详情"),
                "description": describe(format!("获取{cn}详情")),
                "method": "GET",
                "path": detail_path,
                "path_params": id_param,
                "responses": {"200": schema_ref(&model, item.clone())}
            }),
            CrudOperation::Create => json!({
                "title": format!("创建{cn}"),
                "description": describe(format!("创建{cn}")),
                "method": "POST",
                "path": base,
                "request_body_schema": create_body,
                "responses": {"201": schema_ref(&model, item.clone())}
            }),
            CrudOperation::Update => json!({
                "title": format!("更新{cn}"),
                "description": describe(format!("更新{cn}")),
                "method": "PUT",
                "path": detail_path,
                "path_params": id_param,
                "request_body_schema": create_body,
                "responses": {"200": schema_ref(&model, item.clone())}
            }),
            CrudOperation::Delete => json!({
                "title": format!("删除{cn}"),
                "description": describe(format!("删除{cn}")),
                "method": "DELETE",
                "path": detail_path,
                "path_params": id_param,
                "responses": {"204": {"type": "object", "description": "删除成功"}}
            }),
        };
        payload["tags"] = json!(tags);
        payload["folder_id"] = json!(req.folder_id.as_u64());
        payload["components"] = components.clone();
        payloads.push(payload);
    }
    Ok(payloads)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn id_example(ty: PrimitiveType) -> Value {
    match ty {
        PrimitiveType::String => json!("10001"),
        PrimitiveType::Number => json!(10001.0),
        PrimitiveType::Boolean => json!(true),
        PrimitiveType::Integer | PrimitiveType::Null => json!(10001),
    }
}

/// A realistic example object for the model, keeping any example a
/// property already declares.
fn item_example(properties: &Map<String, Value>, id_field: &str) -> Map<String, Value> {
    properties
        .iter()
        .map(|(name, prop)| {
            let value = match prop.get("example") {
                Some(example) => example.clone(),
                None => field_example(name, prop, name == id_field),
            };
            (name.clone(), value)
        })
        .collect()
}

fn field_example(name: &str, prop: &Value, is_id: bool) -> Value {
    let ty = prop.get("type").and_then(Value::as_str).unwrap_or("string");
    let lower = name.to_lowercase();
    match ty {
        "integer" if is_id => json!(10001),
        "integer" => json!(1),
        "number" => json!(1.5),
        "boolean" => json!(true),
        "array" => json!([]),
        "object" => json!({}),
        _ if is_id => json!("10001"),
        _ if lower.contains("email") => json!("user@example.com"),
        _ if lower.contains("phone") => json!("13800138000"),
        _ if lower.contains("name") => json!("示例名称"),
        _ if lower.contains("time") || lower.contains("date") => json!("2024-01-01T12:00:00Z"),
        _ if lower.contains("url") => json!("https://example.com"),
        _ => {
            let description = prop.get("description").and_then(Value::as_str).unwrap_or(name);
            json!(format!("示例{description}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_request() -> CrudRequest {
        serde_json::from_value(json!({
            "resource_name": "user",
            "resource_name_cn": "用户",
            "base_path": "/api/v1/users/",
            "model_schema": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "description": "用户ID"},
                    "name": {"type": "string", "description": "用户名"},
                    "email": {"type": "string", "description": "邮箱"}
                },
                "required": ["id", "name", "email"]
            }
        }))
        .unwrap()
    }

    #[test]
    fn all_five_operations_by_default() {
        let payloads = crud_payloads(&user_request()).unwrap();
        let routes: Vec<String> = payloads
            .iter()
            .map(|p| format!("{} {}", p["method"].as_str().unwrap(), p["path"].as_str().unwrap()))
            .collect();
        assert_eq!(
            routes,
            vec![
                "GET /api/v1/users",
                "GET /api/v1/users/{id}",
                "POST /api/v1/users",
                "PUT /api/v1/users/{id}",
                "DELETE /api/v1/users/{id}",
            ]
        );
        assert_eq!(payloads[0]["tags"], json!(["用户管理"]));
    }

    #[test]
    fn create_body_drops_the_id_field() {
        let payloads = crud_payloads(&user_request()).unwrap();
        let create = &payloads[2];
        let body = &create["components"]["schemas"]["CreateUserRequest"];
        assert!(body["properties"].get("id").is_none());
        assert_eq!(body["required"], json!(["name", "email"]));
        assert_eq!(create["request_body_schema"]["example"]["email"], "user@example.com");
        assert!(create["request_body_schema"]["example"].get("id").is_none());
    }

    #[test]
    fn operations_are_deduplicated_and_ordered() {
        let mut req = user_request();
        req.operations = Some(vec![CrudOperation::Delete, CrudOperation::Get, CrudOperation::Delete]);
        let payloads = crud_payloads(&req).unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0]["method"], "GET");
        assert_eq!(payloads[1]["method"], "DELETE");
    }

    #[test]
    fn undescribed_model_fields_are_refused() {
        let mut req = user_request();
        req.model_schema["properties"]["email"] = json!({"type": "string"});
        let err = crud_payloads(&req).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(ref m) if m.contains("email")), "{err}");
    }

    #[test]
    fn every_generated_payload_passes_validation() {
        let engine = apidoc_rules::RuleEngine::default();
        for payload in crud_payloads(&user_request()).unwrap() {
            let def = apidoc_rules::with_standard_errors(normalize_endpoint(&payload).unwrap());
            let violations = engine.validate_endpoint(&def);
            assert!(violations.is_empty(), "{} {}: {violations:?}", def.method, def.path);
        }
    }

    #[test]
    fn description_prefix_leads_every_description() {
        let mut req = user_request();
        req.description_prefix = Some("【版本】v1".into());
        for payload in crud_payloads(&req).unwrap() {
            assert!(payload["description"].as_str().unwrap().starts_with("【版本】v1\n\n"));
        }
    }
}
