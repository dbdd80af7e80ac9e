//! Saved queries, addressed by name.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{json_results, require, BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::RequestParts;
use crate::types::{SavedQuery, SuccessResponse};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SaveQueryOptions {
    #[serde(skip)]
    pub query_name: String,
    pub created_by: String,
    pub description: String,
    pub query_string: String,
    pub created_on: String,
    pub engine_id: String,
}

impl Endpoint for SaveQueryOptions {
    type Output = SavedQueryResult;

    const OPERATION: Operation = Operation {
        id: "SaveQuery",
        method: HttpMethod::Post,
        path: "/queries/{query_name}",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "query_name", &self.query_name)?;
        require(op, "created_by", &self.created_by)?;
        require(op, "description", &self.description)?;
        require(op, "query_string", &self.query_string)?;
        require(op, "created_on", &self.created_on)?;
        require(op, "engine_id", &self.engine_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.path("query_name", &self.query_name);
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SavedQueryResult {
    pub query: Option<SavedQuery>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteQueryOptions {
    pub query_name: String,
}

impl Endpoint for DeleteQueryOptions {
    type Output = ();

    const OPERATION: Operation = Operation {
        id: "DeleteQuery",
        method: HttpMethod::Delete,
        path: "/queries/{query_name}",
        body: BodyKind::None,
        response: ResponseKind::Empty,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "query_name", &self.query_name)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.path("query_name", &self.query_name);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateQueryOptions {
    #[serde(skip)]
    pub query_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_query_name: Option<String>,
}

impl Endpoint for UpdateQueryOptions {
    type Output = SavedQueryResult;

    const OPERATION: Operation = Operation {
        id: "UpdateQuery",
        method: HttpMethod::Patch,
        path: "/queries/{query_name}",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "query_name", &self.query_name)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.path("query_name", &self.query_name);
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListQueriesOptions;

impl Endpoint for ListQueriesOptions {
    type Output = QueryList;

    const OPERATION: Operation = Operation {
        id: "ListQueries",
        method: HttpMethod::Get,
        path: "/queries",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn bind(&self, _parts: &mut RequestParts) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryList {
    pub queries: Vec<SavedQuery>,
    pub response: Option<SuccessResponse>,
}

json_results!(SavedQueryResult, QueryList);
