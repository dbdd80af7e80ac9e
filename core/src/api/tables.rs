//! Tables, snapshots and CSV ingestion.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{json_results, require, BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::{FilePart, MultipartForm, RequestParts};
use crate::types::{SuccessResponse, TableRef, TableSnapshot};

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteTablesOptions {
    pub delete_tables: Vec<TableRef>,
    pub engine_id: String,
}

impl Endpoint for DeleteTablesOptions {
    type Output = ();

    const OPERATION: Operation = Operation {
        id: "DeleteTables",
        method: HttpMethod::Delete,
        path: "/tables/table",
        body: BodyKind::Json,
        response: ResponseKind::Empty,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "delete_tables", &self.delete_tables)?;
        require(op, "engine_id", &self.engine_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

/// Rename a table. The table is addressed by query parameters.
#[derive(Debug, Clone, Default)]
pub struct UpdateTableOptions {
    pub engine_id: String,
    pub catalog_name: String,
    pub schema_name: String,
    pub table_name: String,
    pub new_table_name: Option<String>,
}

#[derive(Serialize)]
struct UpdateTableBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    new_table_name: Option<&'a str>,
}

impl Endpoint for UpdateTableOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "UpdateTable",
        method: HttpMethod::Patch,
        path: "/tables/table",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "schema_name", &self.schema_name)?;
        require(op, "table_name", &self.table_name)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.query("engine_id", Some(&self.engine_id));
        parts.query("catalog_name", Some(&self.catalog_name));
        parts.query("schema_name", Some(&self.schema_name));
        parts.query("table_name", Some(&self.table_name));
        parts.json(&UpdateTableBody {
            new_table_name: self.new_table_name.as_deref(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListTablesOptions {
    pub engine_id: String,
    pub catalog_name: String,
    pub schema_name: String,
}

impl Endpoint for ListTablesOptions {
    type Output = TableList;

    const OPERATION: Operation = Operation {
        id: "ListTables",
        method: HttpMethod::Get,
        path: "/tables",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "schema_name", &self.schema_name)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.query("engine_id", Some(&self.engine_id));
        parts.query("catalog_name", Some(&self.catalog_name));
        parts.query("schema_name", Some(&self.schema_name));
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableList {
    pub tables: Vec<String>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default)]
pub struct ListTableSnapshotsOptions {
    pub engine_id: String,
    pub catalog_name: String,
    pub schema_name: String,
    pub table_name: String,
}

impl Endpoint for ListTableSnapshotsOptions {
    type Output = SnapshotList;

    const OPERATION: Operation = Operation {
        id: "ListTableSnapshots",
        method: HttpMethod::Get,
        path: "/tables/table/snapshots",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "schema_name", &self.schema_name)?;
        require(op, "table_name", &self.table_name)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.query("engine_id", Some(&self.engine_id));
        parts.query("catalog_name", Some(&self.catalog_name));
        parts.query("schema_name", Some(&self.schema_name));
        parts.query("table_name", Some(&self.table_name));
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SnapshotList {
    pub snapshots: Vec<TableSnapshot>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RollbackSnapshotOptions {
    pub engine_id: String,
    pub catalog_name: String,
    pub schema_name: String,
    pub table_name: String,
    pub snapshot_id: String,
}

impl Endpoint for RollbackSnapshotOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "RollbackSnapshot",
        method: HttpMethod::Post,
        path: "/tables/table/rollback",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "schema_name", &self.schema_name)?;
        require(op, "table_name", &self.table_name)?;
        require(op, "snapshot_id", &self.snapshot_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

/// Ask the engine to infer the layout of a CSV file.
#[derive(Debug, Clone, Default)]
pub struct ParseCsvOptions {
    pub engine: String,
    pub parse_file: Option<FilePart>,
    pub file_type: Option<String>,
}

impl Endpoint for ParseCsvOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "ParseCsv",
        method: HttpMethod::Post,
        path: "/parse/csv",
        body: BodyKind::Multipart,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine", &self.engine)?;
        require(op, "parse_file", &self.parse_file)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.header("engine", Some(self.engine.as_str()));
        let mut form = MultipartForm::new();
        form.file("parse_file", self.parse_file.as_ref());
        form.text("file_type", self.file_type.as_deref());
        parts.multipart(form);
        Ok(())
    }
}

/// Load a CSV file into a table as an ingestion job.
#[derive(Debug, Clone, Default)]
pub struct UploadCsvOptions {
    pub engine: String,
    pub catalog: String,
    pub schema: String,
    pub table_name: String,
    pub ingestion_job_name: String,
    pub scheduled: String,
    pub created_by: String,
    pub target_table: String,
    pub headers: String,
    pub csv: Option<FilePart>,
    pub delimiter: Option<String>,
}

impl Endpoint for UploadCsvOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "UploadCsv",
        method: HttpMethod::Post,
        path: "/v2/upload/csv",
        body: BodyKind::Multipart,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine", &self.engine)?;
        require(op, "catalog", &self.catalog)?;
        require(op, "schema", &self.schema)?;
        require(op, "table_name", &self.table_name)?;
        require(op, "ingestion_job_name", &self.ingestion_job_name)?;
        require(op, "scheduled", &self.scheduled)?;
        require(op, "created_by", &self.created_by)?;
        require(op, "target_table", &self.target_table)?;
        require(op, "headers", &self.headers)?;
        require(op, "csv", &self.csv)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.header("engine", Some(self.engine.as_str()));
        let mut form = MultipartForm::new();
        form.text("catalog", Some(&self.catalog));
        form.text("schema", Some(&self.schema));
        form.text("tableName", Some(&self.table_name));
        form.text("ingestionJobName", Some(&self.ingestion_job_name));
        form.text("scheduled", Some(&self.scheduled));
        form.text("created_by", Some(&self.created_by));
        form.text("targetTable", Some(&self.target_table));
        form.text("headers", Some(&self.headers));
        form.file("csv", self.csv.as_ref());
        form.text("delimiter", self.delimiter.as_deref());
        parts.multipart(form);
        Ok(())
    }
}

json_results!(TableList, SnapshotList);
