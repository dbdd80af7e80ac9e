//! Request builder, dispatcher and response parser for the lakehouse API.
//!
//! # Design
//! `LakehouseClient` holds only immutable configuration plus shared handles
//! to a transport and an authenticator, so clones are cheap and concurrent
//! calls never coordinate. Every operation goes through the same three
//! steps: `build` (validate and assemble an `HttpRequest`, no I/O),
//! `dispatch` (compression, authentication, bounded retries) and `parse`
//! (status check and decoding). `execute` chains them.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{Authenticator, NoAuth};
use crate::config::{ClientConfig, RetryPolicy, DEFAULT_SERVICE_NAME};
use crate::error::{ApiError, ConfigError};
use crate::http::{set_header, HttpRequest, StreamingResponse};
use crate::operation::{Decode, Endpoint, Response};
use crate::request::{resolve_url, RequestBody, RequestParts};
use crate::transport::{CallContext, Transport, UreqTransport};

pub const INSTANCE_ID_HEADER: &str = "LhInstanceId";
pub const ANALYTICS_HEADER: &str = "X-Sdk-Analytics";

const SERVICE_VERSION: &str = "V1";

/// Per-call inputs that are not part of an operation's own options.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Custom headers, applied over client defaults.
    pub headers: BTreeMap<String, String>,
    /// Tenant instance, sent as `LhInstanceId`.
    pub lh_instance_id: Option<String>,
    pub context: CallContext,
}

impl CallOptions {
    pub fn instance(lh_instance_id: &str) -> Self {
        Self {
            lh_instance_id: Some(lh_instance_id.to_string()),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = context;
        self
    }
}

/// Client for the lakehouse API.
#[derive(Clone)]
pub struct LakehouseClient {
    base_url: Url,
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    authenticator: Arc<dyn Authenticator>,
}

impl std::fmt::Debug for LakehouseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LakehouseClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}

impl LakehouseClient {
    /// Client with default configuration against `base_url`, unauthenticated.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = UreqTransport::new(config.timeout);
        Self::with_parts(config, Arc::new(transport), Arc::new(NoAuth))
    }

    /// Assemble a client from explicit collaborators.
    pub fn with_parts(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.service_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {e}", config.service_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(config.service_url));
        }
        Ok(Self {
            base_url,
            config: Arc::new(config),
            transport,
            authenticator,
        })
    }

    /// Configure from `LAKEHOUSE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = ClientConfig::from_env(DEFAULT_SERVICE_NAME)?;
        let transport = UreqTransport::new(settings.config.timeout);
        Self::with_parts(
            settings.config,
            Arc::new(transport),
            Arc::from(settings.authenticator),
        )
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validate `options` and assemble the request. Performs no I/O.
    pub fn build<E: Endpoint>(&self, options: &E, call: &CallOptions) -> Result<HttpRequest, ApiError> {
        let operation = &E::OPERATION;
        debug_assert_eq!(operation.response, <E::Output as Decode>::KIND, "{}", operation.id);
        options.validate()?;

        let mut parts = RequestParts::default();
        options.bind(&mut parts)?;
        let url = resolve_url(&self.base_url, operation, &parts)?;

        let mut headers = Vec::new();
        set_header(
            &mut headers,
            "User-Agent",
            concat!("lakehouse-sdk-rust/", env!("CARGO_PKG_VERSION")),
        );
        set_header(
            &mut headers,
            ANALYTICS_HEADER,
            &format!(
                "service_name={DEFAULT_SERVICE_NAME};service_version={SERVICE_VERSION};operation_id={}",
                operation.id
            ),
        );
        for (name, value) in &self.config.default_headers {
            set_header(&mut headers, name, value);
        }
        for (name, value) in &call.headers {
            set_header(&mut headers, name, value);
        }
        if let Some(accept) = operation.accept() {
            set_header(&mut headers, "Accept", accept);
        }
        let body = match parts.body {
            Some(RequestBody::Json(bytes)) => {
                set_header(&mut headers, "Content-Type", "application/json");
                Some(bytes)
            }
            Some(RequestBody::Multipart(form)) => {
                set_header(&mut headers, "Content-Type", &form.content_type());
                Some(form.encode())
            }
            None => None,
        };
        for (name, value) in &parts.headers {
            set_header(&mut headers, name, value);
        }
        if let Some(instance) = &call.lh_instance_id {
            set_header(&mut headers, INSTANCE_ID_HEADER, instance);
        }

        Ok(HttpRequest {
            method: operation.method,
            url: url.into(),
            headers,
            body,
        })
    }

    /// Interpret a response for operation `E`.
    pub fn parse<E: Endpoint>(&self, response: StreamingResponse) -> Result<Response<E::Output>, ApiError> {
        let meta = response.meta();
        if !(200..300).contains(&response.status) {
            let buffered = response.into_buffered().map_err(|e| ApiError::Decode {
                message: e.to_string(),
                meta,
            })?;
            return Err(ApiError::from_status(buffered));
        }
        let result = E::Output::decode(response)?;
        Ok(Response { result, meta })
    }

    /// Build, send and parse one call.
    pub fn execute<E: Endpoint>(&self, options: &E, call: &CallOptions) -> Result<Response<E::Output>, ApiError> {
        let request = self.build(options, call)?;
        let response = self.dispatch(request, &call.context)?;
        self.parse::<E>(response)
    }

    /// Send a built request through the shared pipeline: optional gzip,
    /// authentication, then the transport with bounded retries.
    pub fn dispatch(&self, mut request: HttpRequest, context: &CallContext) -> Result<StreamingResponse, ApiError> {
        if self.config.enable_gzip && request.header("Content-Encoding").is_none() {
            if let Some(body) = request.body.take() {
                request.body = Some(gzip(&body)?);
                request.set_header("Content-Encoding", "gzip");
            }
        }
        self.authenticator.authenticate(&mut request)?;

        let max_retries = self.config.retry.as_ref().map_or(0, |policy| policy.max_retries);
        let mut attempt = 0;
        loop {
            context.check()?;
            debug!(method = %request.method, url = %request.url, attempt, "sending request");
            let outcome = self.transport.send(&request, context);
            let delay = match (&outcome, &self.config.retry) {
                (_, None) => None,
                _ if attempt >= max_retries => None,
                (Ok(response), Some(policy)) if RetryPolicy::is_retryable_status(response.status) => {
                    let delay = retry_after(response, policy).unwrap_or_else(|| policy.backoff(attempt));
                    warn!(status = response.status, attempt, ?delay, "retrying after transient status");
                    Some(delay)
                }
                (Err(error), Some(policy)) if error.is_retryable() => {
                    let delay = policy.backoff(attempt);
                    warn!(%error, attempt, ?delay, "retrying after transport failure");
                    Some(delay)
                }
                _ => None,
            };
            match delay {
                Some(delay) => {
                    drop(outcome);
                    context.sleep(delay)?;
                    attempt += 1;
                }
                None => return outcome.map_err(ApiError::from),
            }
        }
    }
}

/// A numeric `Retry-After` (seconds) within the policy's maximum interval.
fn retry_after(response: &StreamingResponse, policy: &RetryPolicy) -> Option<std::time::Duration> {
    let seconds: u64 = response.header("Retry-After")?.trim().parse().ok()?;
    let delay = std::time::Duration::from_secs(seconds);
    (delay <= policy.max_interval).then_some(delay)
}

fn gzip(body: &[u8]) -> Result<Vec<u8>, ApiError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(body)
        .and_then(|()| encoder.finish())
        .map_err(|e| ApiError::Serialization(format!("gzip: {e}")))
}
