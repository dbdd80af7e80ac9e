//! Blocking client for the lakehouse data-platform API.
//!
//! # Overview
//! Each API operation is an Options struct implementing `Endpoint`. The
//! client turns it into an `HttpRequest`, sends it through a shared
//! `Transport` and decodes the reply into the operation's typed result.
//!
//! ```no_run
//! use lakehouse_core::api::access::GetEnginePermissionsOptions;
//! use lakehouse_core::{CallOptions, LakehouseClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LakehouseClient::from_env()?;
//! let options = GetEnginePermissionsOptions {
//!     engine_id: "presto01".to_string(),
//! };
//! let response = client.execute(&options, &CallOptions::instance("my-instance"))?;
//! println!("{} users", response.result.users.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - Endpoints are declarative: an `Operation` table row plus a `bind`
//!   method. One generic executor handles them all.
//! - `build` and `parse` are pure, so hosts that execute HTTP themselves can
//!   use them directly; `execute` adds dispatch through the transport.
//! - Optional fields are `Option`, so unset values never reach the wire.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod operation;
pub mod request;
pub mod transport;
pub mod types;

pub use auth::{Authenticator, BearerToken, NoAuth};
pub use client::{CallOptions, LakehouseClient};
pub use config::{ClientConfig, RetryPolicy};
pub use error::{ApiError, ConfigError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, ResponseMeta, StreamingResponse};
pub use operation::{ByteStream, Endpoint, Operation, Response};
pub use request::FilePart;
pub use transport::{CallContext, CancellationToken, Transport, UreqTransport};
