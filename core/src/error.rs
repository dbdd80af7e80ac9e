//! Error types for the lakehouse client.
//!
//! # Design
//! Every failure a call can produce is one `ApiError` variant: local
//! validation, request construction, authentication, transport, HTTP status
//! and decoding. Variants that happen after a response was received carry its
//! `ResponseMeta` so callers can still inspect status and headers.

use serde::Deserialize;
use thiserror::Error;

use crate::http::{HttpResponse, ResponseMeta};

/// A required option was missing or empty. Raised before any network I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: required option `{field}` is not set")]
pub struct ValidationError {
    pub operation: &'static str,
    pub field: &'static str,
}

/// Failures below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Timeouts and connection failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout(_) | TransportError::Connection(_))
    }
}

/// Errors returned by `LakehouseClient`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The endpoint did not bind a parameter its path template names.
    #[error("{operation}: path parameter `{name}` is not bound")]
    UnboundPathParameter {
        operation: &'static str,
        name: String,
    },

    /// A path parameter value that URL normalisation would remove
    /// (`.` or `..`), so the request could not address the named resource.
    #[error("{operation}: path parameter `{name}` cannot be `{value}`")]
    InvalidPathParameter {
        operation: &'static str,
        name: String,
        value: String,
    },

    #[error("invalid service URL: {0}")]
    InvalidUrl(String),

    /// The request payload could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("call cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        code: Option<String>,
        body: String,
        meta: ResponseMeta,
    },

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {message}")]
    Decode { message: String, meta: ResponseMeta },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        self.meta().map(|meta| meta.status)
    }

    pub fn meta(&self) -> Option<&ResponseMeta> {
        match self {
            ApiError::Status { meta, .. } | ApiError::Decode { meta, .. } => Some(meta),
            _ => None,
        }
    }

    /// Service-specific message code, when the error body carried one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Map a non-2xx response to `ApiError::Status`, decoding the error body
    /// when it has one of the shapes the service emits.
    pub(crate) fn from_status(response: HttpResponse) -> Self {
        let meta = ResponseMeta {
            status: response.status,
            headers: response.headers,
        };
        let body = String::from_utf8_lossy(&response.body).into_owned();
        let decoded = serde_json::from_slice::<ErrorBody>(&response.body)
            .ok()
            .and_then(ErrorBody::into_message);
        let (message, code) = match decoded {
            Some(found) => found,
            None => (fallback_message(meta.status), None),
        };
        ApiError::Status {
            status: meta.status,
            message,
            code,
            body,
            meta,
        }
    }
}

/// Configuration could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("unsupported authentication type: {0}")]
    UnsupportedAuthType(String),

    #[error("{0} must be set for bearer token authentication")]
    MissingBearerToken(String),

    #[error("invalid service URL: {0}")]
    InvalidUrl(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
    message: Option<String>,
    #[serde(rename = "_messageCode_")]
    message_code: Option<String>,
    error: Option<String>,
    #[serde(rename = "errorMessage")]
    error_message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorItem {
    message: Option<String>,
    code: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<(String, Option<String>)> {
        if let Some(message) = self.message {
            return Some((message, self.message_code));
        }
        if let Some(first) = self.errors.into_iter().next() {
            if let Some(message) = first.message {
                return Some((message, first.code.or(self.message_code)));
            }
        }
        self.error
            .or(self.error_message)
            .map(|message| (message, self.message_code))
    }
}

fn fallback_message(status: u16) -> String {
    ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("unexpected status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn structured_error_exposes_message_and_code() {
        let err = ApiError::from_status(response(
            400,
            r#"{"message":"policy exists","_messageCode_":"conflict"}"#,
        ));
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.code(), Some("conflict"));
        assert!(matches!(err, ApiError::Status { ref message, .. } if message == "policy exists"));
    }

    #[test]
    fn errors_array_is_understood() {
        let err = ApiError::from_status(response(
            403,
            r#"{"errors":[{"code":"forbidden","message":"no access"}],"trace":"abc"}"#,
        ));
        assert_eq!(err.code(), Some("forbidden"));
        assert_eq!(err.to_string(), "HTTP 403: no access");
    }

    #[test]
    fn undecodable_body_still_exposes_status() {
        let err = ApiError::from_status(response(502, "<html>bad gateway</html>"));
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.code(), None);
        assert!(
            matches!(err, ApiError::Status { ref message, ref body, .. } if message == "Bad Gateway" && body.contains("html"))
        );
    }

    #[test]
    fn not_found_is_detectable() {
        let err = ApiError::from_status(response(404, ""));
        assert!(err.is_not_found());
    }

    #[test]
    fn transport_retryability() {
        assert!(TransportError::Timeout("t".into()).is_retryable());
        assert!(TransportError::Connection("c".into()).is_retryable());
        assert!(!TransportError::Other("o".into()).is_retryable());
    }
}
