//! Object-store bucket registrations.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ValidationError};
use crate::http::HttpMethod;
use crate::operation::{json_results, require, BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::RequestParts;
use crate::types::{Bucket, BucketDetails, SuccessResponse};

#[derive(Debug, Clone, Default)]
pub struct ListBucketsOptions;

impl Endpoint for ListBucketsOptions {
    type Output = BucketList;

    const OPERATION: Operation = Operation {
        id: "ListBuckets",
        method: HttpMethod::Get,
        path: "/buckets",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn bind(&self, _parts: &mut RequestParts) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BucketList {
    pub buckets: Vec<Bucket>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateBucketOptions {
    pub bucket_details: Option<BucketDetails>,
    pub bucket_type: String,
    pub description: String,
    pub managed_by: String,
    pub table_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Endpoint for CreateBucketOptions {
    type Output = BucketResult;

    const OPERATION: Operation = Operation {
        id: "CreateBucket",
        method: HttpMethod::Post,
        path: "/buckets/bucket",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        let op = &Self::OPERATION;
        require(op, "bucket_details", &self.bucket_details)?;
        if let Some(details) = &self.bucket_details {
            require(op, "bucket_details.bucket_name", &details.bucket_name)?;
        }
        require(op, "bucket_type", &self.bucket_type)?;
        require(op, "description", &self.description)?;
        require(op, "managed_by", &self.managed_by)?;
        require(op, "table_type", &self.table_type)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BucketResult {
    pub bucket: Option<Bucket>,
    pub response: Option<SuccessResponse>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteBucketOptions {
    pub bucket_id: String,
}

impl Endpoint for DeleteBucketOptions {
    type Output = ();

    const OPERATION: Operation = Operation {
        id: "DeleteBucket",
        method: HttpMethod::Delete,
        path: "/buckets/bucket",
        body: BodyKind::Json,
        response: ResponseKind::Empty,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "bucket_id", &self.bucket_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBucketOptions {
    pub bucket_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Endpoint for UpdateBucketOptions {
    type Output = BucketResult;

    const OPERATION: Operation = Operation {
        id: "UpdateBucket",
        method: HttpMethod::Patch,
        path: "/buckets/bucket",
        body: BodyKind::Json,
        response: ResponseKind::Json,
    };

    fn validate(&self) -> Result<(), ValidationError> {
        require(&Self::OPERATION, "bucket_id", &self.bucket_id)
    }

    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError> {
        parts.json(self)
    }
}

json_results!(BucketList, BucketResult);
