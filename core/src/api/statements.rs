//! Statement execution and plan inspection.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{
    json_results, require, BodyKind, ByteStream, Endpoint, Operation, ResponseKind,
};
use crate::request::{MultipartForm, RequestParts};
use crate::types::SuccessResponse;

/// Run SQL on an engine. The result rows are returned as a raw stream in
/// the engine's own wire format.
#[derive(Debug, Clone, Default)]
pub struct PostStatementOptions {
    pub engine: String,
    pub catalog: String,
    pub schema: String,
    pub sql_query: String,
}

impl Endpoint for PostStatementOptions {
    type Output = ByteStream;

    const OPERATION: Operation = Operation {
        id: "PostStatement",
        method: HttpMethod::Post,
        path: "/v1/statement",
        body: BodyKind::Multipart,
        response: ResponseKind::Stream,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine", &self.engine)?;
        require(op, "catalog", &self.catalog)?;
        require(op, "schema", &self.schema)?;
        require(op, "sql_query", &self.sql_query)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.query("engine", Some(&self.engine));
        let mut form = MultipartForm::new();
        form.text("catalog", Some(&self.catalog));
        form.text("schema", Some(&self.schema));
        form.text("sqlQuery", Some(&self.sql_query));
        parts.multipart(form);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExplainStatementOptions {
    pub engine_id: String,
    pub statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
}

impl Endpoint for ExplainStatementOptions {
    type Output = ExplainResult;

    const OPERATION: Operation = Operation {
        id: "ExplainStatement",
        method: HttpMethod::Post,
        path: "/explain",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "statement", &self.statement)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExplainAnalyzeStatementOptions {
    pub catalog_name: String,
    pub engine_id: String,
    pub schema_name: String,
    pub statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl Endpoint for ExplainAnalyzeStatementOptions {
    type Output = ExplainResult;

    const OPERATION: Operation = Operation {
        id: "ExplainAnalyzeStatement",
        method: HttpMethod::Post,
        path: "/explainanalyze",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "engine_id", &self.engine_id)?;
        require(op, "schema_name", &self.schema_name)?;
        require(op, "statement", &self.statement)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

/// Plan text produced by explain and explain-analyze.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExplainResult {
    pub result: Option<String>,
    pub response: Option<SuccessResponse>,
}

json_results!(ExplainResult);
