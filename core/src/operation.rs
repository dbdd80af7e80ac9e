//! Declarative description of API operations.
//!
//! # Design
//! Every endpoint is one `Operation` entry (method, path template, body and
//! response shape) plus an Options struct implementing `Endpoint`. The single
//! generic executor in `client` consumes both, so adding an endpoint never
//! means writing another request/response function.

use std::fmt;
use std::io::{self, Read};

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ValidationError};
use crate::http::{HttpMethod, ResponseMeta, StreamingResponse};
use crate::request::RequestParts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    None,
    Json,
    Multipart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Typed JSON result.
    Json,
    /// Raw body handed to the caller unread.
    Stream,
    /// No result beyond status metadata.
    Empty,
}

/// One row of the operation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub id: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub body: BodyKind,
    pub response: ResponseKind,
}

impl Operation {
    pub(crate) fn accept(&self) -> Option<&'static str> {
        match self.response {
            ResponseKind::Json => Some("application/json"),
            ResponseKind::Stream | ResponseKind::Empty => None,
        }
    }
}

/// Implemented by every Options struct.
pub trait Endpoint {
    type Output: Decode;

    const OPERATION: Operation;

    /// Reject missing required options. Runs before any I/O.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Bind path parameters, query parameters, header fields and body.
    fn bind(&self, parts: &mut RequestParts) -> Result<(), ApiError>;
}

/// Converts a successful response into an operation's output.
pub trait Decode: Sized {
    const KIND: ResponseKind;

    fn decode(response: StreamingResponse) -> Result<Self, ApiError>;
}

impl Decode for () {
    const KIND: ResponseKind = ResponseKind::Empty;

    fn decode(_response: StreamingResponse) -> Result<Self, ApiError> {
        Ok(())
    }
}

/// Live response body for streaming operations. Reading consumes the
/// connection; dropping it releases the connection.
pub struct ByteStream(Box<dyn Read + Send>);

impl ByteStream {
    pub fn into_inner(self) -> Box<dyn Read + Send> {
        self.0
    }
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteStream(..)")
    }
}

impl Decode for ByteStream {
    const KIND: ResponseKind = ResponseKind::Stream;

    fn decode(response: StreamingResponse) -> Result<Self, ApiError> {
        Ok(ByteStream(response.body))
    }
}

/// Buffer the body and decode it as `T`.
pub(crate) fn decode_json<T: DeserializeOwned>(response: StreamingResponse) -> Result<T, ApiError> {
    let meta = response.meta();
    let buffered = response.into_buffered().map_err(|e| ApiError::Decode {
        message: e.to_string(),
        meta: meta.clone(),
    })?;
    if buffered.body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::Decode {
            message: "empty response body".to_string(),
            meta,
        });
    }
    serde_json::from_slice(&buffered.body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
        meta,
    })
}

/// Implement `Decode` for JSON result structs.
macro_rules! json_results {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::operation::Decode for $ty {
                const KIND: $crate::operation::ResponseKind = $crate::operation::ResponseKind::Json;

                fn decode(
                    response: $crate::http::StreamingResponse,
                ) -> Result<Self, $crate::error::ApiError> {
                    $crate::operation::decode_json(response)
                }
            }
        )*
    };
}
pub(crate) use json_results;

/// A decoded result with the metadata of the response that carried it.
#[derive(Debug)]
pub struct Response<T> {
    pub result: T,
    pub meta: ResponseMeta,
}

/// Values that count as "not set" for required options.
pub(crate) trait Required {
    fn is_unset(&self) -> bool;
}

impl Required for String {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Required for Vec<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl<T> Required for Option<T> {
    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

pub(crate) fn require<T: Required>(
    operation: &Operation,
    field: &'static str,
    value: &T,
) -> Result<(), ValidationError> {
    if value.is_unset() {
        return Err(ValidationError {
            operation: operation.id,
            field,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;

    #[derive(Debug, Default, serde::Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        name: Option<String>,
        items: Vec<i64>,
    }

    fn response(body: &str) -> StreamingResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
        .into()
    }

    #[test]
    fn json_decode_ignores_unknown_and_defaults_missing() {
        let sample: Sample = decode_json(response(r#"{"name":"x","extra":1}"#)).unwrap();
        assert_eq!(
            sample,
            Sample {
                name: Some("x".to_string()),
                items: Vec::new()
            }
        );
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = decode_json::<Sample>(response("not json")).unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref meta, .. } if meta.status == 200));
    }

    #[test]
    fn empty_body_is_decode_error() {
        let err = decode_json::<Sample>(response("  ")).unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn byte_stream_is_returned_unread() {
        let mut stream = ByteStream::decode(response("raw rows")).unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).unwrap();
        assert_eq!(out, "raw rows");
    }

    #[test]
    fn required_values() {
        assert!(String::new().is_unset());
        assert!(!"x".to_string().is_unset());
        assert!(Vec::<u8>::new().is_unset());
        assert!(None::<u8>.is_unset());
        assert!(!Some(0u8).is_unset());
    }
}
