//! Access control: database connection grants, data policies and engine
//! permissions.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{json_results, require, BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::RequestParts;
use crate::types::{
    DataPolicy, DbConnGroup, DbConnUser, GroupPermission, PolicyMetadata, Rule, SuccessResponse,
    UserPermission,
};

/// Grant users and groups access to a registered database.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateDbConnUsersOptions {
    pub database_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<DbConnGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<DbConnUser>,
}

impl Endpoint for CreateDbConnUsersOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "CreateDbConnUsers",
        method: HttpMethod::Post,
        path: "/access/databases",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "database_id", &self.database_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListDataPoliciesOptions {
    pub catalog_name: Option<String>,
    pub status: Option<String>,
    pub include_data_controls: Option<bool>,
}

impl Endpoint for ListDataPoliciesOptions {
    type Output = DataPolicyList;

    const OPERATION: Operation = Operation {
        id: "ListDataPolicies",
        method: HttpMethod::Get,
        path: "/access/data_policies",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.query("catalog_name", self.catalog_name.as_deref());
        parts.query("status", self.status.as_deref());
        parts.query("include_data_controls", self.include_data_controls);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataPolicyList {
    pub data_policies: Vec<DataPolicy>,
    pub total_count: Option<i64>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateDataPolicyOptions {
    pub catalog_name: String,
    pub data_artifact: String,
    pub policy_name: String,
    pub rules: Vec<Rule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Endpoint for CreateDataPolicyOptions {
    type Output = CreatedDataPolicy;

    const OPERATION: Operation = Operation {
        id: "CreateDataPolicy",
        method: HttpMethod::Post,
        path: "/access/data_policies",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "data_artifact", &self.data_artifact)?;
        require(op, "policy_name", &self.policy_name)?;
        require(op, "rules", &self.rules)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreatedDataPolicy {
    pub data_policy: Option<DataPolicy>,
    pub metadata: Option<PolicyMetadata>,
    pub response: Option<SuccessResponse>,
}

/// Remove data policies by name. An empty list is sent as no body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteDataPoliciesOptions {
    pub data_policies: Vec<String>,
}

impl Endpoint for DeleteDataPoliciesOptions {
    type Output = ();

    const OPERATION: Operation = Operation {
        id: "DeleteDataPolicies",
        method: HttpMethod::Delete,
        path: "/access/data_policies",
        body: BodyKind::Json,
        response: ResponseKind::Empty,
    };

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        if self.data_policies.is_empty() {
            return Ok(());
        }
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetEnginePermissionsOptions {
    pub engine_id: String,
}

impl Endpoint for GetEnginePermissionsOptions {
    type Output = EnginePermissions;

    const OPERATION: Operation = Operation {
        id: "GetEnginePermissions",
        method: HttpMethod::Get,
        path: "/access/engines/{engine_id}",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "engine_id", &self.engine_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.path("engine_id", &self.engine_id);
        Ok(())
    }
}

/// Users and groups holding a permission on one engine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnginePermissions {
    pub engine_id: Option<String>,
    pub groups: Vec<GroupPermission>,
    pub users: Vec<UserPermission>,
    pub total_count: Option<i64>,
    pub response: Option<SuccessResponse>,
}

json_results!(DataPolicyList, CreatedDataPolicy, EnginePermissions);
