//! Service health and instance information.

use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::operation::{BodyKind, Endpoint, Operation, ResponseKind};
use crate::request::RequestParts;
use crate::types::InstanceDetails;

/// Succeeds when the service reports ready.
#[derive(Debug, Clone, Default)]
pub struct CheckReadyOptions;

impl Endpoint for CheckReadyOptions {
    type Output = ();

    const OPERATION: Operation = Operation {
        id: "CheckReady",
        method: HttpMethod::Get,
        path: "/ready",
        body: BodyKind::None,
        response: ResponseKind::Empty,
    };

    fn bind(&self, _parts: &mut RequestParts) -> Result<(), ApiError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct GetInstanceDetailsOptions;

impl Endpoint for GetInstanceDetailsOptions {
    type Output = InstanceDetails;

    const OPERATION: Operation = Operation {
        id: "GetInstanceDetails",
        method: HttpMethod::Get,
        path: "/instance",
        body: BodyKind::None,
        response: ResponseKind::Json,
    };

    fn bind(&self, _parts: &mut RequestParts) -> Result<(), ApiError> {
        Ok(())
    }
}
