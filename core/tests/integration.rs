//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port with its own state, then
//! drives the client over real HTTP through `UreqTransport`. The shared
//! `MockState` lets tests assert on what reached the server.

use std::io::Read;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use lakehouse_core::api::access::{
    CreateDataPolicyOptions, DeleteDataPoliciesOptions, GetEnginePermissionsOptions,
    ListDataPoliciesOptions,
};
use lakehouse_core::api::instance::CheckReadyOptions;
use lakehouse_core::api::queries::{
    DeleteQueryOptions, ListQueriesOptions, SaveQueryOptions, UpdateQueryOptions,
};
use lakehouse_core::api::statements::PostStatementOptions;
use lakehouse_core::types::{Rule, RuleGrantee};
use lakehouse_core::{
    ApiError, CallOptions, ClientConfig, HttpMethod, HttpResponse, LakehouseClient, RetryPolicy,
};
use mock_server::MockState;

fn start(state: Arc<MockState>) -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, state).await
        })
        .unwrap();
    });

    addr
}

fn service_url(addr: SocketAddr) -> String {
    format!("http://{addr}/api/v1")
}

fn policy(name: &str) -> CreateDataPolicyOptions {
    CreateDataPolicyOptions {
        catalog_name: "iceberg_data".to_string(),
        data_artifact: "hr/employees".to_string(),
        policy_name: name.to_string(),
        rules: vec![Rule {
            actions: vec!["select".to_string()],
            effect: Some("deny".to_string()),
            grantee: RuleGrantee {
                value: "bob".to_string(),
                key: "user_name".to_string(),
                grantee_type: "user_identity".to_string(),
            },
        }],
        description: None,
        status: None,
    }
}

#[test]
fn engine_permissions_with_instance_header() {
    let addr = start(Arc::new(MockState::default()));
    let client = LakehouseClient::new(&service_url(addr)).unwrap();
    let options = GetEnginePermissionsOptions {
        engine_id: "presto01".to_string(),
    };

    let response = client
        .execute(&options, &CallOptions::instance("inst-1"))
        .unwrap();
    assert_eq!(response.meta.status, 200);
    assert_eq!(response.result.engine_id.as_deref(), Some("presto01"));
    assert_eq!(response.result.users.len(), 1);
    assert_eq!(response.result.users[0].user_name.as_deref(), Some("alice"));
    assert!(response.result.groups.is_empty());

    let err = client
        .execute(&options, &CallOptions::default())
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.code(), Some("missing_instance"));
}

#[test]
fn unknown_engine_is_not_found() {
    let addr = start(Arc::new(MockState::default()));
    let client = LakehouseClient::new(&service_url(addr)).unwrap();
    let options = GetEnginePermissionsOptions {
        engine_id: "spark9".to_string(),
    };

    let err = client
        .execute(&options, &CallOptions::instance("inst-1"))
        .unwrap_err();
    assert!(err.is_not_found());
    match err {
        ApiError::Status { message, .. } => assert_eq!(message, "engine not found"),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[test]
fn data_policy_lifecycle() {
    let state = Arc::new(MockState::default());
    let addr = start(state.clone());
    let client = LakehouseClient::new(&service_url(addr)).unwrap();
    let call = CallOptions::default();

    let created = client.execute(&policy("mask_ssn"), &call).unwrap();
    assert_eq!(created.meta.status, 201);
    let data_policy = created.result.data_policy.unwrap();
    assert_eq!(data_policy.policy_name.as_deref(), Some("mask_ssn"));
    assert_eq!(data_policy.rule_count, Some(1));
    assert_eq!(data_policy.rules[0].grantee.grantee_type, "user_identity");

    let err = client.execute(&policy("mask_ssn"), &call).unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.code(), Some("conflict"));

    let listed = client
        .execute(
            &ListDataPoliciesOptions {
                catalog_name: Some("iceberg_data".to_string()),
                ..Default::default()
            },
            &call,
        )
        .unwrap();
    assert_eq!(listed.result.total_count, Some(1));

    let deleted = client
        .execute(
            &DeleteDataPoliciesOptions {
                data_policies: vec!["mask_ssn".to_string()],
            },
            &call,
        )
        .unwrap();
    assert_eq!(deleted.meta.status, 204);

    let listed = client
        .execute(&ListDataPoliciesOptions::default(), &call)
        .unwrap();
    assert!(listed.result.data_policies.is_empty());
}

#[test]
fn saved_query_lifecycle() {
    let addr = start(Arc::new(MockState::default()));
    let client = LakehouseClient::new(&service_url(addr)).unwrap();
    let call = CallOptions::default();

    let saved = client
        .execute(
            &SaveQueryOptions {
                query_name: "daily report".to_string(),
                created_by: "alice".to_string(),
                description: "rows per day".to_string(),
                query_string: "select count(*) from t".to_string(),
                created_on: "1700000000".to_string(),
                engine_id: "presto01".to_string(),
            },
            &call,
        )
        .unwrap();
    assert_eq!(
        saved.result.query.unwrap().query_name.as_deref(),
        Some("daily report")
    );

    let updated = client
        .execute(
            &UpdateQueryOptions {
                query_name: "daily report".to_string(),
                new_query_name: Some("nightly".to_string()),
                ..Default::default()
            },
            &call,
        )
        .unwrap();
    let query = updated.result.query.unwrap();
    assert_eq!(query.query_name.as_deref(), Some("nightly"));
    assert_eq!(query.query_string.as_deref(), Some("select count(*) from t"));

    let listed = client.execute(&ListQueriesOptions, &call).unwrap();
    assert_eq!(listed.result.queries.len(), 1);

    let delete = DeleteQueryOptions {
        query_name: "nightly".to_string(),
    };
    client.execute(&delete, &call).unwrap();
    let err = client.execute(&delete, &call).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn ready_retries_until_service_recovers() {
    let state = Arc::new(MockState::default());
    state.ready_failures.store(2, Ordering::SeqCst);
    let addr = start(state.clone());
    let config = ClientConfig::new(&service_url(addr)).with_retries(RetryPolicy {
        max_retries: 3,
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(50),
    });
    let client = LakehouseClient::with_config(config).unwrap();

    let response = client
        .execute(&CheckReadyOptions, &CallOptions::default())
        .unwrap();
    assert_eq!(response.meta.status, 204);
    assert_eq!(state.request_count(), 3);
}

#[test]
fn ready_without_retries_reports_unavailable() {
    let state = Arc::new(MockState::default());
    state.ready_failures.store(1, Ordering::SeqCst);
    let addr = start(state.clone());
    let client = LakehouseClient::new(&service_url(addr)).unwrap();

    let err = client
        .execute(&CheckReadyOptions, &CallOptions::default())
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(state.request_count(), 1);
}

#[test]
fn statement_result_is_streamed() {
    let addr = start(Arc::new(MockState::default()));
    let client = LakehouseClient::new(&service_url(addr)).unwrap();
    let options = PostStatementOptions {
        engine: "presto01".to_string(),
        catalog: "iceberg_data".to_string(),
        schema: "hr".to_string(),
        sql_query: "select * from employees".to_string(),
    };

    let response = client.execute(&options, &CallOptions::default()).unwrap();
    assert_eq!(response.meta.status, 200);
    let mut rows = String::new();
    response.result.into_inner().read_to_string(&mut rows).unwrap();
    assert_eq!(rows, "engine=presto01\nstate=FINISHED\n");
}

#[test]
fn validation_failure_never_reaches_server() {
    let state = Arc::new(MockState::default());
    let addr = start(state.clone());
    let client = LakehouseClient::new(&service_url(addr)).unwrap();

    let err = client
        .execute(&policy(""), &CallOptions::default())
        .unwrap_err();
    match err {
        ApiError::Validation(e) => assert_eq!(e.field, "policy_name"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(state.request_count(), 0);
}

#[test]
fn host_executed_request_round_trip() {
    let addr = start(Arc::new(MockState::default()));
    let client = LakehouseClient::new(&service_url(addr)).unwrap();
    let options = GetEnginePermissionsOptions {
        engine_id: "presto01".to_string(),
    };

    let request = client
        .build(&options, &CallOptions::instance("inst-1"))
        .unwrap();
    assert_eq!(request.method, HttpMethod::Get);

    // Execute outside the client, the way a host with its own HTTP stack would.
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let mut builder = agent.get(&request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    let mut reply = builder.call().unwrap();
    let status = reply.status().as_u16();
    let body = reply.body_mut().read_to_vec().unwrap();

    let parsed = client
        .parse::<GetEnginePermissionsOptions>(
            HttpResponse {
                status,
                headers: Vec::new(),
                body,
            }
            .into(),
        )
        .unwrap();
    assert_eq!(parsed.result.total_count, Some(1));
}
