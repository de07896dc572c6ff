//! Contract tests for EndpointClient against a wiremock stand-in for the
//! documentation service.
//!
//! ## Endpoints Tested
//!
//! | Method | Path (relative to project) | Test |
//! |--------|----------------------------|------|
//! | GET    | `/api-endpoints` | `list_*` |
//! | GET    | `/api-endpoints/{id}` | `get_*` |
//! | POST   | `/api-endpoints` | `create_*` |
//! | PUT    | `/api-endpoints/{id}` | `update_*` |
//! | DELETE | `/api-endpoints/{id}` | `delete_*` |

use apidoc_client::{ApifoxApiError, ApifoxClient, ApifoxConfig, ListScope, PageCursor};
use apidoc_core::{normalize_endpoint, EndpointId, FolderId, HttpMethod, StatusCode};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT: &str = "/v1/projects/123456";

/// Build an ApifoxClient pointed at a wiremock server.
async fn test_client(mock_server: &MockServer) -> ApifoxClient {
    let config = ApifoxConfig::local_mock(&mock_server.uri(), "123456", "test-token").unwrap();
    ApifoxClient::new(config).unwrap()
}

fn user_detail() -> serde_json::Value {
    json!({
        "id": 12,
        "title": "获取用户信息",
        "description": "根据用户ID获取用户详细信息",
        "method": "GET",
        "path": "/users/{id}",
        "status": "released",
        "folderId": 3,
        "tags": ["用户管理"],
        "responses": {
            "200": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "description": "用户唯一标识", "example": 10001}
                }
            }
        }
    })
}

// ── GET /api-endpoints ───────────────────────────────────────────────

#[tokio::test]
async fn list_sends_auth_version_locale_and_scope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints")))
        .and(header("authorization", "Bearer test-token"))
        .and(header("x-apifox-api-version", "2024-03-28"))
        .and(query_param("locale", "zh-CN"))
        .and(query_param("folderId", "3"))
        .and(query_param("tag", "用户管理"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": 12, "name": "获取用户信息", "method": "get", "path": "/users/{id}", "tags": ["用户管理"], "folderId": 3}
            ],
            "nextCursor": "page-2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let scope = ListScope {
        folder_id: Some(FolderId(3)),
        tag: Some("用户管理".into()),
    };
    let page = client.endpoints().list_page(&scope, None, 100).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, EndpointId(12));
    assert_eq!(page.items[0].method, HttpMethod::Get);
    assert_eq!(page.next_cursor, Some(PageCursor("page-2".into())));
}

#[tokio::test]
async fn list_all_follows_cursors_in_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints")))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 3, "title": "删除用户", "method": "DELETE", "path": "/users/{id}"}],
            "nextCursor": null
        })))
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": 1, "title": "获取用户列表", "method": "GET", "path": "/users"},
                {"id": 2, "title": "创建用户", "method": "POST", "path": "/users"}
            ],
            "nextCursor": "c2"
        })))
        .with_priority(5)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let all = client.endpoints().list_all(&ListScope::all(), 2).await.unwrap();
    let ids: Vec<u64> = all.iter().map(|s| s.id.as_u64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn list_retries_transient_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .with_priority(5)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let page = client
        .endpoints()
        .list_page(&ListScope::all(), None, 10)
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert!(page.is_last());
}

// ── GET /api-endpoints/{id} ─────────────────────────────────────────

#[tokio::test]
async fn get_normalizes_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints/12")))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_detail()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let def = client.endpoints().get(EndpointId(12)).await.unwrap();
    assert_eq!(def.id, Some(EndpointId(12)));
    assert_eq!(def.title, "获取用户信息");
    assert_eq!(def.folder_id, FolderId(3));
    assert!(def.response_schema.contains_key(&StatusCode::OK));
}

#[tokio::test]
async fn get_unwraps_success_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints/12")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "data": user_detail()})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let def = client.endpoints().get(EndpointId(12)).await.unwrap();
    assert_eq!(def.path, "/users/{id}");
}

#[tokio::test]
async fn get_404_surfaces_upstream_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints/99")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "接口不存在"})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let err = client.endpoints().get(EndpointId(99)).await.unwrap_err();
    assert!(err.is_not_found());
    match err {
        ApifoxApiError::ApiError { status, body, .. } => {
            assert_eq!(status, 404);
            assert_eq!(body, "接口不存在");
        }
        other => panic!("expected ApiError, got: {other:?}"),
    }
}

#[tokio::test]
async fn get_malformed_detail_is_structural() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{PROJECT}/api-endpoints/5")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "title": "坏数据"})))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let err = client.endpoints().get(EndpointId(5)).await.unwrap_err();
    assert!(matches!(err, ApifoxApiError::Malformed { .. }), "{err:?}");
    assert!(!err.is_transient());
}

// ── POST / PUT / DELETE ─────────────────────────────────────────────

#[tokio::test]
async fn create_posts_wire_form_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PROJECT}/api-endpoints")))
        .and(body_partial_json(json!({
            "title": "获取用户信息",
            "method": "GET",
            "path": "/users/{id}",
            "folderId": 3
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_detail()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let mut def = normalize_endpoint(&user_detail()).unwrap();
    def.id = None;
    let created = client.endpoints().create(&def).await.unwrap();
    assert_eq!(created.id, Some(EndpointId(12)));
}

#[tokio::test]
async fn mutations_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("{PROJECT}/api-endpoints")))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let def = normalize_endpoint(&user_detail()).unwrap();
    let err = client.endpoints().create(&def).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn update_with_empty_body_echoes_definition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("{PROJECT}/api-endpoints/12")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    let mut def = normalize_endpoint(&user_detail()).unwrap();
    def.id = None;
    let updated = client.endpoints().update(EndpointId(12), &def).await.unwrap();
    assert_eq!(updated.id, Some(EndpointId(12)));
    assert_eq!(updated.title, def.title);
}

#[tokio::test]
async fn delete_sends_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{PROJECT}/api-endpoints/12")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server).await;
    client.endpoints().delete(EndpointId(12)).await.unwrap();
}

#[tokio::test]
async fn connection_refused_is_http_error() {
    let config = ApifoxConfig::local_mock("http://127.0.0.1:1", "123456", "test-token").unwrap();
    let client = ApifoxClient::new(config).unwrap();
    let err = client.endpoints().delete(EndpointId(1)).await.unwrap_err();
    assert!(matches!(err, ApifoxApiError::Http { .. }));
    assert!(err.is_transient());
}
