//! # Standard Error Injector
//!
//! Every endpoint documents the same set of generic error responses. The
//! injector adds the ones a caller left out, using a fixed envelope:
//!
//! ```json
//! {"code": 404, "message": "请求的资源不存在", "details": {}}
//! ```
//!
//! A status the caller already defined is never replaced, so
//! `inject(inject(x)) == inject(x)`.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use apidoc_core::{EndpointDefinition, HttpMethod, PrimitiveType, SchemaNode, StatusCode};

/// Required on every endpoint.
const BASE_ERRORS: [StatusCode; 7] = [
    StatusCode::BAD_REQUEST,
    StatusCode::UNAUTHORIZED,
    StatusCode::FORBIDDEN,
    StatusCode::NOT_FOUND,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
];

/// Required on endpoints whose requests carry a body.
const BODY_ERRORS: [StatusCode; 9] = [
    StatusCode::BAD_REQUEST,
    StatusCode::UNAUTHORIZED,
    StatusCode::FORBIDDEN,
    StatusCode::NOT_FOUND,
    StatusCode::CONFLICT,
    StatusCode::UNPROCESSABLE_ENTITY,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
];

/// Error statuses every endpoint with `method` must document, ascending.
pub fn required_error_statuses(method: HttpMethod) -> &'static [StatusCode] {
    if method.carries_body() {
        &BODY_ERRORS
    } else {
        &BASE_ERRORS
    }
}

/// Name, message and optional details example for a standard status.
fn standard_error_text(status: StatusCode) -> Option<(&'static str, &'static str, Option<Value>)> {
    let entry = match status.as_u16() {
        400 => (
            "请求参数错误",
            "请求参数错误",
            Some(json!({"field": "name", "reason": "不能为空"})),
        ),
        401 => ("未授权", "未授权，请先登录", None),
        403 => ("禁止访问", "无权限访问此资源", None),
        404 => ("资源不存在", "请求的资源不存在", None),
        409 => ("资源冲突", "资源已存在或状态冲突", None),
        422 => (
            "实体无法处理",
            "请求格式正确但语义错误",
            Some(json!({"field": "email", "reason": "格式不正确"})),
        ),
        500 => ("服务器内部错误", "服务器内部错误，请稍后重试", None),
        502 => ("网关错误", "网关错误，上游服务不可用", None),
        503 => ("服务不可用", "服务暂时不可用，请稍后重试", None),
        _ => return None,
    };
    Some(entry)
}

/// The standard envelope for `status`, or `None` if `status` is not part of
/// the standard set.
pub fn standard_error_schema(status: StatusCode) -> Option<SchemaNode> {
    let (name, message, details) = standard_error_text(status)?;

    let mut example = json!({"code": status.as_u16(), "message": message});
    if let Some(details) = details {
        example["details"] = details;
    }

    Some(
        SchemaNode::object([
            (
                "code",
                SchemaNode::primitive(PrimitiveType::Integer).with_description("错误码"),
            ),
            (
                "message",
                SchemaNode::primitive(PrimitiveType::String).with_description("错误信息"),
            ),
            (
                "details",
                SchemaNode::object(Vec::<(String, SchemaNode)>::new()).with_description("详细信息"),
            ),
        ])
        .with_required(["code", "message"])
        .with_description(name)
        .with_example(example),
    )
}

/// Return `responses` with every missing required error status added.
pub fn inject_standard_errors(
    method: HttpMethod,
    responses: &BTreeMap<StatusCode, SchemaNode>,
) -> BTreeMap<StatusCode, SchemaNode> {
    let mut out = responses.clone();
    for &status in required_error_statuses(method) {
        if out.contains_key(&status) {
            continue;
        }
        if let Some(schema) = standard_error_schema(status) {
            out.insert(status, schema);
        }
    }
    out
}

/// Apply [`inject_standard_errors`] to an endpoint definition.
pub fn with_standard_errors(mut def: EndpointDefinition) -> EndpointDefinition {
    let before = def.response_schema.len();
    def.response_schema = inject_standard_errors(def.method, &def.response_schema);
    tracing::debug!(
        method = %def.method,
        path = %def.path,
        added = def.response_schema.len() - before,
        "injected standard error responses"
    );
    def
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_only() -> BTreeMap<StatusCode, SchemaNode> {
        BTreeMap::from([(
            StatusCode::OK,
            SchemaNode::primitive(PrimitiveType::String).with_example(json!("ok")),
        )])
    }

    #[test]
    fn get_receives_base_set_only() {
        let out = inject_standard_errors(HttpMethod::Get, &ok_only());
        let codes: Vec<u16> = out.keys().map(StatusCode::as_u16).collect();
        assert_eq!(codes, vec![200, 400, 401, 403, 404, 500, 502, 503]);
    }

    #[test]
    fn post_also_receives_conflict_and_unprocessable() {
        let out = inject_standard_errors(HttpMethod::Post, &ok_only());
        assert!(out.contains_key(&StatusCode::CONFLICT));
        assert!(out.contains_key(&StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(out.len(), 10);
    }

    #[test]
    fn caller_definition_is_preserved() {
        let custom = SchemaNode::primitive(PrimitiveType::String)
            .with_description("自定义未找到")
            .with_example(json!("没有这个用户"));
        let mut input = ok_only();
        input.insert(StatusCode::NOT_FOUND, custom.clone());

        let out = inject_standard_errors(HttpMethod::Get, &input);
        assert_eq!(out[&StatusCode::NOT_FOUND], custom);
        assert_eq!(out[&StatusCode::OK], input[&StatusCode::OK]);
    }

    #[test]
    fn standard_envelope_shape() {
        let schema = standard_error_schema(StatusCode::NOT_FOUND).unwrap();
        assert_eq!(
            schema.example,
            Some(json!({"code": 404, "message": "请求的资源不存在"}))
        );
        let props = schema.properties().unwrap();
        assert_eq!(props["code"].description.as_deref(), Some("错误码"));
        assert!(standard_error_schema(StatusCode::OK).is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_method() -> impl Strategy<Value = HttpMethod> {
            prop::sample::select(HttpMethod::ALL.to_vec())
        }

        fn arb_responses() -> impl Strategy<Value = BTreeMap<StatusCode, SchemaNode>> {
            prop::collection::btree_map(
                (100u16..600).prop_filter_map("valid status", StatusCode::new),
                "[a-z]{0,8}".prop_map(|s| {
                    SchemaNode::primitive(PrimitiveType::String).with_example(json!(s))
                }),
                0..8,
            )
        }

        proptest! {
            #[test]
            fn injection_is_idempotent(method in arb_method(), responses in arb_responses()) {
                let once = inject_standard_errors(method, &responses);
                let twice = inject_standard_errors(method, &once);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn injection_adds_exactly_the_missing_required(
                method in arb_method(),
                responses in arb_responses(),
            ) {
                let out = inject_standard_errors(method, &responses);
                for (status, schema) in &responses {
                    prop_assert_eq!(&out[status], schema);
                }
                for status in out.keys().filter(|s| !responses.contains_key(s)) {
                    prop_assert!(required_error_statuses(method).contains(status));
                }
                for status in required_error_statuses(method) {
                    prop_assert!(out.contains_key(status));
                }
            }
        }
    }
}
