//! Catalogs, metastores and their engine associations.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{json_results, require, BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::RequestParts;
use crate::types::{Catalog, Metastore, SuccessResponse};

#[derive(Debug, Clone, Default)]
pub struct ListCatalogsOptions;

impl Endpoint for ListCatalogsOptions {
    type Output = CatalogList;

    const OPERATION: Operation = Operation {
        id: "ListCatalogs",
        method: HttpMethod::Get,
        path: "/catalogs",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn bind(&self, _parts: &mut RequestParts) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogList {
    pub catalogs: Vec<Catalog>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default)]
pub struct ListMetastoresOptions;

impl Endpoint for ListMetastoresOptions {
    type Output = MetastoreList;

    const OPERATION: Operation = Operation {
        id: "ListMetastores",
        method: HttpMethod::Get,
        path: "/metastores",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn bind(&self, _parts: &mut RequestParts) -> Result<(), ApiError> {
        Ok(())
    }
}

/// The service lists metastores under the `catalogs` key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetastoreList {
    pub catalogs: Vec<Metastore>,
    pub response: Option<SuccessResponse>,
}

/// Body shared by the add and remove association operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogEngineOptions {
    pub catalog_name: String,
    pub engine_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl CatalogEngineOptions {
    fn validate_for(&self, op: &Operation) -> Result<(), ValidationError> {
        require(op, "catalog_name", &self.catalog_name)?;
        require(op, "engine_id", &self.engine_id)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AddCatalogToEngineOptions(pub CatalogEngineOptions);

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RemoveCatalogFromEngineOptions(pub CatalogEngineOptions);

impl Endpoint for AddCatalogToEngineOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "AddCatalogToEngine",
        method: HttpMethod::Post,
        path: "/catalogs/add_catalog_to_engine",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate_for(&Self::OPERATION)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

impl Endpoint for RemoveCatalogFromEngineOptions {
    type Output = SuccessResponse;

    const OPERATION: Operation = Operation {
        id: "RemoveCatalogFromEngine",
        method: HttpMethod::Post,
        path: "/catalogs/remove_catalog_from_engine",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        self.0.validate_for(&Self::OPERATION)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

json_results!(CatalogList, MetastoreList);
