//! In-memory stand-in for the lakehouse API, used by client tests.
//!
//! Serves a subset of the real routes under `/api/v1`: engine permissions,
//! data policies, saved queries, readiness and statements. Error responses
//! use the service's `{"message", "_messageCode_"}` shape.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const INSTANCE_HEADER: &str = "lhinstanceid";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataPolicy {
    pub policy_id: String,
    pub policy_name: String,
    pub catalog_name: String,
    pub data_artifact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rules: Vec<Value>,
    pub rule_count: usize,
    pub status: String,
}

#[derive(Deserialize)]
pub struct CreateDataPolicy {
    pub policy_name: String,
    pub catalog_name: String,
    pub data_artifact: String,
    pub rules: Vec<Value>,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct PolicyFilter {
    pub catalog_name: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct DeletePolicies {
    #[serde(default)]
    pub data_policies: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SavedQuery {
    pub query_name: String,
    pub query_string: String,
    pub description: String,
    pub engine_id: String,
    pub created_by: String,
    pub created_on: String,
}

#[derive(Deserialize)]
pub struct SaveQuery {
    pub query_string: String,
    pub description: String,
    pub engine_id: String,
    pub created_by: String,
    pub created_on: String,
}

#[derive(Deserialize)]
pub struct UpdateQuery {
    pub query_string: Option<String>,
    pub description: Option<String>,
    pub new_query_name: Option<String>,
}

#[derive(Deserialize)]
pub struct StatementParams {
    pub engine: String,
}

/// Shared server state. `requests` counts every request received.
#[derive(Debug, Default)]
pub struct MockState {
    pub policies: RwLock<BTreeMap<String, DataPolicy>>,
    pub queries: RwLock<BTreeMap<String, SavedQuery>>,
    pub requests: AtomicUsize,
    /// `/ready` answers 503 this many times before succeeding.
    pub ready_failures: AtomicU32,
}

impl MockState {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

pub type Db = Arc<MockState>;

pub fn app() -> Router {
    app_with_state(Arc::new(MockState::default()))
}

pub fn app_with_state(state: Db) -> Router {
    let api = Router::new()
        .route("/access/engines/{engine_id}", get(get_engine_permissions))
        .route(
            "/access/data_policies",
            get(list_data_policies)
                .post(create_data_policy)
                .delete(delete_data_policies),
        )
        .route("/queries", get(list_queries))
        .route(
            "/queries/{query_name}",
            post(save_query).patch(update_query).delete(delete_query),
        )
        .route("/ready", get(ready))
        .route("/v1/statement", post(post_statement));

    Router::new()
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(state.clone(), count_requests))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, Arc::new(MockState::default())).await
}

pub async fn run_with_state(listener: TcpListener, state: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn count_requests(State(db): State<Db>, request: Request, next: Next) -> Response {
    db.requests.fetch_add(1, Ordering::SeqCst);
    tracing::debug!(method = %request.method(), uri = %request.uri(), "mock request");
    next.run(request).await
}

fn error(status: StatusCode, message: &str, code: &str) -> Response {
    (
        status,
        Json(json!({ "message": message, "_messageCode_": code })),
    )
        .into_response()
}

fn success(message: &str) -> Value {
    json!({ "message": message, "_messageCode_": "success" })
}

async fn get_engine_permissions(headers: HeaderMap, Path(engine_id): Path<String>) -> Response {
    if !headers.contains_key(INSTANCE_HEADER) {
        return error(
            StatusCode::BAD_REQUEST,
            "LhInstanceId header is required",
            "missing_instance",
        );
    }
    if engine_id != "presto01" {
        return error(StatusCode::NOT_FOUND, "engine not found", "not_found");
    }
    Json(json!({
        "engine_id": engine_id,
        "users": [{ "user_name": "alice", "permission": "can_administer" }],
        "groups": [],
        "total_count": 1,
    }))
    .into_response()
}

async fn list_data_policies(State(db): State<Db>, Query(filter): Query<PolicyFilter>) -> Response {
    let policies = db.policies.read().await;
    let matching: Vec<&DataPolicy> = policies
        .values()
        .filter(|p| filter.catalog_name.as_ref().map_or(true, |c| &p.catalog_name == c))
        .filter(|p| filter.status.as_ref().map_or(true, |s| &p.status == s))
        .collect();
    Json(json!({ "data_policies": matching, "total_count": matching.len() })).into_response()
}

async fn create_data_policy(State(db): State<Db>, Json(input): Json<CreateDataPolicy>) -> Response {
    let mut policies = db.policies.write().await;
    if policies.contains_key(&input.policy_name) {
        return error(StatusCode::CONFLICT, "data policy already exists", "conflict");
    }
    let policy = DataPolicy {
        policy_id: uuid::Uuid::new_v4().to_string(),
        policy_name: input.policy_name,
        catalog_name: input.catalog_name,
        data_artifact: input.data_artifact,
        description: input.description,
        rule_count: input.rules.len(),
        rules: input.rules,
        status: input.status.unwrap_or_else(|| "active".to_string()),
    };
    policies.insert(policy.policy_name.clone(), policy.clone());
    (
        StatusCode::CREATED,
        Json(json!({
            "data_policy": policy,
            "metadata": { "creator": "mock" },
            "response": success("data policy created"),
        })),
    )
        .into_response()
}

async fn delete_data_policies(State(db): State<Db>, body: Bytes) -> Response {
    let names = if body.is_empty() {
        Vec::new()
    } else {
        match serde_json::from_slice::<DeletePolicies>(&body) {
            Ok(parsed) => parsed.data_policies,
            Err(e) => return error(StatusCode::BAD_REQUEST, &e.to_string(), "invalid_body"),
        }
    };
    let mut policies = db.policies.write().await;
    for name in names {
        policies.remove(&name);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_queries(State(db): State<Db>) -> Response {
    let queries = db.queries.read().await;
    let all: Vec<&SavedQuery> = queries.values().collect();
    Json(json!({ "queries": all })).into_response()
}

async fn save_query(
    State(db): State<Db>,
    Path(query_name): Path<String>,
    Json(input): Json<SaveQuery>,
) -> Response {
    let mut queries = db.queries.write().await;
    if queries.contains_key(&query_name) {
        return error(StatusCode::CONFLICT, "query already exists", "conflict");
    }
    let query = SavedQuery {
        query_name: query_name.clone(),
        query_string: input.query_string,
        description: input.description,
        engine_id: input.engine_id,
        created_by: input.created_by,
        created_on: input.created_on,
    };
    queries.insert(query_name, query.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "query": query, "response": success("query saved") })),
    )
        .into_response()
}

async fn update_query(
    State(db): State<Db>,
    Path(query_name): Path<String>,
    Json(input): Json<UpdateQuery>,
) -> Response {
    let mut queries = db.queries.write().await;
    let Some(mut query) = queries.remove(&query_name) else {
        return error(StatusCode::NOT_FOUND, "query not found", "not_found");
    };
    if let Some(query_string) = input.query_string {
        query.query_string = query_string;
    }
    if let Some(description) = input.description {
        query.description = description;
    }
    if let Some(new_name) = input.new_query_name {
        query.query_name = new_name;
    }
    queries.insert(query.query_name.clone(), query.clone());
    Json(json!({ "query": query, "response": success("query updated") })).into_response()
}

async fn delete_query(State(db): State<Db>, Path(query_name): Path<String>) -> Response {
    let mut queries = db.queries.write().await;
    match queries.remove(&query_name) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error(StatusCode::NOT_FOUND, "query not found", "not_found"),
    }
}

async fn ready(State(db): State<Db>) -> Response {
    let failing = db
        .ready_failures
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            [("Retry-After", "0")],
            "warming up",
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn post_statement(
    headers: HeaderMap,
    Query(params): Query<StatementParams>,
    body: Bytes,
) -> Response {
    let is_multipart = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if !is_multipart || !body.windows(17).any(|w| w == b"name=\"sqlQuery\"\r\n") {
        return error(StatusCode::BAD_REQUEST, "sqlQuery form field is required", "invalid_body");
    }
    (
        StatusCode::OK,
        [("Content-Type", "text/plain")],
        format!("engine={}\nstate=FINISHED\n", params.engine),
    )
        .into_response()
}
