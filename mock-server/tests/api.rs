use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, MockState};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

const POLICY: &str = r#"{
    "policy_name": "mask_ssn",
    "catalog_name": "iceberg_data",
    "data_artifact": "hr/employees",
    "rules": [{"actions": ["select"], "effect": "deny", "grantee": {"value": "bob", "key": "user_name", "type": "user_identity"}}]
}"#;

// --- engine permissions ---

#[tokio::test]
async fn engine_permissions_require_instance_header() {
    let resp = app()
        .oneshot(get("/api/v1/access/engines/presto01"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["_messageCode_"], "missing_instance");
}

#[tokio::test]
async fn engine_permissions_returns_users() {
    let req = Request::builder()
        .uri("/api/v1/access/engines/presto01")
        .header("LhInstanceId", "inst-1")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["users"][0]["user_name"], "alice");
    assert_eq!(body["total_count"], 1);
}

#[tokio::test]
async fn unknown_engine_returns_404() {
    let req = Request::builder()
        .uri("/api/v1/access/engines/spark9")
        .header("LhInstanceId", "inst-1")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "engine not found");
}

// --- data policies ---

#[tokio::test]
async fn create_policy_returns_201_then_409() {
    let state = Arc::new(MockState::default());

    let resp = app_with_state(state.clone())
        .oneshot(json_request("POST", "/api/v1/access/data_policies", POLICY))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["data_policy"]["rule_count"], 1);
    assert_eq!(body["data_policy"]["status"], "active");

    let resp = app_with_state(state)
        .oneshot(json_request("POST", "/api/v1/access/data_policies", POLICY))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_policies_filters_by_catalog() {
    let state = Arc::new(MockState::default());
    app_with_state(state.clone())
        .oneshot(json_request("POST", "/api/v1/access/data_policies", POLICY))
        .await
        .unwrap();

    let resp = app_with_state(state.clone())
        .oneshot(get("/api/v1/access/data_policies?catalog_name=iceberg_data"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total_count"], 1);

    let resp = app_with_state(state)
        .oneshot(get("/api/v1/access/data_policies?catalog_name=other"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total_count"], 0);
}

#[tokio::test]
async fn delete_policies_accepts_empty_body() {
    let req = Request::builder()
        .method("DELETE")
        .uri("/api/v1/access/data_policies")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn delete_policies_removes_named() {
    let state = Arc::new(MockState::default());
    app_with_state(state.clone())
        .oneshot(json_request("POST", "/api/v1/access/data_policies", POLICY))
        .await
        .unwrap();

    let resp = app_with_state(state.clone())
        .oneshot(json_request(
            "DELETE",
            "/api/v1/access/data_policies",
            r#"{"data_policies":["mask_ssn"]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(state.policies.read().await.is_empty());
}

// --- saved queries ---

#[tokio::test]
async fn saved_query_lifecycle() {
    let state = Arc::new(MockState::default());
    let save = r#"{"query_string":"select 1","description":"d","engine_id":"presto01","created_by":"alice","created_on":"1700000000"}"#;

    let resp = app_with_state(state.clone())
        .oneshot(json_request("POST", "/api/v1/queries/daily", save))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app_with_state(state.clone())
        .oneshot(json_request(
            "PATCH",
            "/api/v1/queries/daily",
            r#"{"new_query_name":"nightly"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["query"]["query_name"], "nightly");

    let resp = app_with_state(state.clone())
        .oneshot(get("/api/v1/queries"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["queries"].as_array().unwrap().len(), 1);

    let delete = |name: &str| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/queries/{name}"))
            .body(String::new())
            .unwrap()
    };
    let resp = app_with_state(state.clone()).oneshot(delete("nightly")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app_with_state(state).oneshot(delete("nightly")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- readiness ---

#[tokio::test]
async fn ready_fails_configured_times() {
    let state = Arc::new(MockState::default());
    state.ready_failures.store(1, Ordering::SeqCst);

    let resp = app_with_state(state.clone()).oneshot(get("/api/v1/ready")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.headers()["retry-after"], "0");

    let resp = app_with_state(state.clone()).oneshot(get("/api/v1/ready")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(state.request_count(), 2);
}

// --- statements ---

#[tokio::test]
async fn statement_requires_multipart_query() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/v1/v1/statement?engine=presto01",
            r#"{"sqlQuery":"select 1"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn statement_streams_text() {
    let body = "--b\r\nContent-Disposition: form-data; name=\"sqlQuery\"\r\n\r\nselect 1\r\n--b--\r\n";
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/v1/statement?engine=presto01")
        .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=b")
        .body(body.to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert_eq!(&bytes[..], b"engine=presto01\nstate=FINISHED\n");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(get("/api/v1/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
