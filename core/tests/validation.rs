//! Required options are rejected before a request is assembled.

use lakehouse_core::api::access::{
    CreateDataPolicyOptions, CreateDbConnUsersOptions, GetEnginePermissionsOptions,
};
use lakehouse_core::api::buckets::{CreateBucketOptions, DeleteBucketOptions};
use lakehouse_core::api::catalogs::AddCatalogToEngineOptions;
use lakehouse_core::api::databases::CreateDatabaseOptions;
use lakehouse_core::api::engines::{CreateEngineOptions, PauseEngineOptions};
use lakehouse_core::api::queries::{SaveQueryOptions, UpdateQueryOptions};
use lakehouse_core::api::schemas::CreateSchemaOptions;
use lakehouse_core::api::statements::{ExplainStatementOptions, PostStatementOptions};
use lakehouse_core::api::tables::{ParseCsvOptions, RollbackSnapshotOptions};
use lakehouse_core::{ApiError, CallOptions, Endpoint, HttpRequest, LakehouseClient};
use rstest::rstest;

type Build = fn(&LakehouseClient) -> Result<HttpRequest, ApiError>;

fn build_default<E: Endpoint + Default>(client: &LakehouseClient) -> Result<HttpRequest, ApiError> {
    client.build(&E::default(), &CallOptions::default())
}

#[rstest]
#[case::db_conn_users("CreateDbConnUsers", "database_id", build_default::<CreateDbConnUsersOptions>)]
#[case::data_policy("CreateDataPolicy", "catalog_name", build_default::<CreateDataPolicyOptions>)]
#[case::engine_permissions("GetEnginePermissions", "engine_id", build_default::<GetEnginePermissionsOptions>)]
#[case::create_bucket("CreateBucket", "bucket_details", build_default::<CreateBucketOptions>)]
#[case::delete_bucket("DeleteBucket", "bucket_id", build_default::<DeleteBucketOptions>)]
#[case::add_catalog("AddCatalogToEngine", "catalog_name", build_default::<AddCatalogToEngineOptions>)]
#[case::create_database("CreateDatabase", "catalog_name", build_default::<CreateDatabaseOptions>)]
#[case::create_engine("CreateEngine", "origin", build_default::<CreateEngineOptions>)]
#[case::pause_engine("PauseEngine", "engine_id", build_default::<PauseEngineOptions>)]
#[case::create_schema("CreateSchema", "catalog_name", build_default::<CreateSchemaOptions>)]
#[case::rollback("RollbackSnapshot", "engine_id", build_default::<RollbackSnapshotOptions>)]
#[case::parse_csv("ParseCsv", "engine", build_default::<ParseCsvOptions>)]
#[case::save_query("SaveQuery", "query_name", build_default::<SaveQueryOptions>)]
#[case::update_query("UpdateQuery", "query_name", build_default::<UpdateQueryOptions>)]
#[case::statement("PostStatement", "engine", build_default::<PostStatementOptions>)]
#[case::explain("ExplainStatement", "engine_id", build_default::<ExplainStatementOptions>)]
fn missing_required_option_is_rejected(
    #[case] operation: &str,
    #[case] field: &str,
    #[case] build: Build,
) {
    let client = LakehouseClient::new("http://localhost:3000/api/v1").unwrap();
    match build(&client).unwrap_err() {
        ApiError::Validation(e) => {
            assert_eq!(e.operation, operation);
            assert_eq!(e.field, field);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[rstest]
#[case::engine_permissions(build_default::<GetEnginePermissionsOptions>, "GetEnginePermissions: required option `engine_id` is not set")]
#[case::save_query(build_default::<SaveQueryOptions>, "SaveQuery: required option `query_name` is not set")]
fn validation_message_names_operation_and_field(#[case] build: Build, #[case] expected: &str) {
    let client = LakehouseClient::new("http://localhost:3000/api/v1").unwrap();
    assert_eq!(build(&client).unwrap_err().to_string(), expected);
}
