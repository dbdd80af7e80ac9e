//! External database registrations.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{json_results, require, BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::RequestParts;
use crate::types::{Database, DatabaseDetails, SuccessResponse};

#[derive(Debug, Clone, Default)]
pub struct ListDatabasesOptions;

impl Endpoint for ListDatabasesOptions {
    type Output = DatabaseList;

    const OPERATION: Operation = Operation {
        id: "ListDatabases",
        method: HttpMethod::Get,
        path: "/databases",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn bind(&self, _parts: &mut RequestParts) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseList {
    pub databases: Vec<Database>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateDatabaseOptions {
    pub catalog_name: String,
    pub database_display_name: String,
    pub database_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_details: Option<DatabaseDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Endpoint for CreateDatabaseOptions {
    type Output = DatabaseResult;

    const OPERATION: Operation = Operation {
        id: "CreateDatabase",
        method: HttpMethod::Post,
        path: "/databases/database",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "database_display_name", &self.database_display_name)?;
        require(op, "database_type", &self.database_type)?;
        if let Some(details) = &self.database_details {
            require(op, "database_details.hostname", &details.hostname)?;
        }
        Ok(())
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseResult {
    pub database: Option<Database>,
    pub response: Option<SuccessResponse>,
}

json_results!(DatabaseList, DatabaseResult);
