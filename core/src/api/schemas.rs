//! Schemas inside a catalog.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{json_results, require, BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::RequestParts;
use crate::types::SuccessResponse;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateSchemaOptions {
    pub catalog_name: String,
    pub engine_id: String,
    pub schema_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Endpoint for CreateSchemaOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "CreateSchema",
        method: HttpMethod::Post,
        path: "/schemas/schema",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "schema_name", &self.schema_name)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteSchemaOptions {
    pub catalog_name: String,
    pub engine_id: String,
    pub schema_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Endpoint for DeleteSchemaOptions {
    type Output = ();

    const OPERATION: Operation = Operation {
        id: "DeleteSchema",
        method: HttpMethod::Delete,
        path: "/schemas/schema",
        body: BodyKind::Json,
        response: ResponseKind::Empty,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "schema_name", &self.schema_name)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListSchemasOptions {
    pub engine_id: String,
    pub catalog_name: String,
}

impl Endpoint for ListSchemasOptions {
    type Output = SchemaList;

    const OPERATION: Operation = Operation {
        id: "ListSchemas",
        method: HttpMethod::Get,
        path: "/schemas",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "catalog_name", &self.catalog_name)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.query("engine_id", Some(&self.engine_id));
        parts.query("catalog_name", Some(&self.catalog_name));
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaList {
    pub schemas: Vec<String>,
    pub response: Option<SuccessResponse>,
}

json_results!(SchemaList);
