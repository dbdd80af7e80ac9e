//! Query engine lifecycle.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{json_results, require, BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::RequestParts;
use crate::types::{Engine, EngineDetails, NodeDescription, SuccessResponse};

#[derive(Debug, Clone, Default)]
pub struct ListEnginesOptions;

impl Endpoint for ListEnginesOptions {
    type Output = EngineList;

    const OPERATION: Operation = Operation {
        id: "ListEngines",
        method: HttpMethod::Get,
        path: "/engines",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn bind(&self, _parts: &mut RequestParts) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineList {
    pub engines: Vec<Engine>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateEngineOptions {
    pub origin: String,
    #[serde(rename = "type")]
    pub engine_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_details: Option<EngineDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_time_use: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub associated_catalogs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Endpoint for CreateEngineOptions {
    type Output = EngineResult;

    const OPERATION: Operation = Operation {
        id: "CreateEngine",
        method: HttpMethod::Post,
        path: "/engines/engine",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "origin", &self.origin)?;
        require(op, "type", &self.engine_type)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineResult {
    pub engine: Option<Engine>,
    pub response: Option<SuccessResponse>,
}

/// Resize or relabel an engine; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateEngineOptions {
    pub engine_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinator: Option<NodeDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker: Option<NodeDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Endpoint for UpdateEngineOptions {
    type Output = EngineResult;

    const OPERATION: Operation = Operation {
        id: "UpdateEngine",
        method: HttpMethod::Patch,
        path: "/engines/engine",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "engine_id", &self.engine_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

/// Body shared by the delete, pause and resume operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineActionOptions {
    pub engine_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DeleteEngineOptions(pub EngineActionOptions);

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct PauseEngineOptions(pub EngineActionOptions);

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ResumeEngineOptions(pub EngineActionOptions);

impl Endpoint for DeleteEngineOptions {
    type Output = ();

    const OPERATION: Operation = Operation {
        id: "DeleteEngine",
        method: HttpMethod::Delete,
        path: "/engines/engine",
        body: BodyKind::Json,
        response: ResponseKind::Empty,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "engine_id", &self.0.engine_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

impl Endpoint for PauseEngineOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "PauseEngine",
        method: HttpMethod::Post,
        path: "/engines/engine/pause",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "engine_id", &self.0.engine_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

impl Endpoint for ResumeEngineOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "ResumeEngine",
        method: HttpMethod::Post,
        path: "/engines/engine/resume",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "engine_id", &self.0.engine_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

json_results!(EngineList, EngineResult);
