//! Endpoint catalogue.
//!
//! One Options struct per operation, grouped by resource. `OPERATIONS` is
//! the declarative table of every endpoint the client knows.

pub mod access;
pub mod buckets;
pub mod catalogs;
pub mod databases;
pub mod engines;
pub mod instance;
pub mod queries;
pub mod schemas;
pub mod statements;
pub mod tables;

use crate::operation::{Endpoint, Operation};

pub static OPERATIONS: &[Operation] = &[
    access::CreateDbConnUsersOptions::OPERATION,
    access::ListDataPoliciesOptions::OPERATION,
    access::CreateDataPolicyOptions::OPERATION,
    access::DeleteDataPoliciesOptions::OPERATION,
    access::GetEnginePermissionsOptions::OPERATION,
    buckets::ListBucketsOptions::OPERATION,
    buckets::CreateBucketOptions::OPERATION,
    buckets::DeleteBucketOptions::OPERATION,
    buckets::UpdateBucketOptions::OPERATION,
    databases::ListDatabasesOptions::OPERATION,
    databases::CreateDatabaseOptions::OPERATION,
    engines::ListEnginesOptions::OPERATION,
    engines::CreateEngineOptions::OPERATION,
    engines::UpdateEngineOptions::OPERATION,
    engines::DeleteEngineOptions::OPERATION,
    engines::PauseEngineOptions::OPERATION,
    engines::ResumeEngineOptions::OPERATION,
    catalogs::ListCatalogsOptions::OPERATION,
    catalogs::ListMetastoresOptions::OPERATION,
    catalogs::AddCatalogToEngineOptions::OPERATION,
    catalogs::RemoveCatalogFromEngineOptions::OPERATION,
    schemas::CreateSchemaOptions::OPERATION,
    schemas::DeleteSchemaOptions::OPERATION,
    schemas::ListSchemasOptions::OPERATION,
    statements::PostStatementOptions::OPERATION,
    tables::DeleteTablesOptions::OPERATION,
    tables::UpdateTableOptions::OPERATION,
    tables::ListTablesOptions::OPERATION,
    tables::ListTableSnapshotsOptions::OPERATION,
    tables::RollbackSnapshotOptions::OPERATION,
    tables::ParseCsvOptions::OPERATION,
    tables::UploadCsvOptions::OPERATION,
    queries::SaveQueryOptions::OPERATION,
    queries::DeleteQueryOptions::OPERATION,
    queries::UpdateQueryOptions::OPERATION,
    queries::ListQueriesOptions::OPERATION,
    instance::CheckReadyOptions::OPERATION,
    statements::ExplainStatementOptions::OPERATION,
    statements::ExplainAnalyzeStatementOptions::OPERATION,
    instance::GetInstanceDetailsOptions::OPERATION,
];

/// Look up an operation by id.
pub fn operation(id: &str) -> Option<&'static Operation> {
    OPERATIONS.iter().find(|op| op.id == id)
}
