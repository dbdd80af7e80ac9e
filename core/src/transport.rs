//! Transport abstraction and the default `ureq`-backed implementation.
//!
//! # Design
//! A `Transport` performs exactly one HTTP exchange. Retries, compression and
//! authentication live above it in the client pipeline, so test doubles only
//! have to answer requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{ApiError, TransportError};
use crate::http::{HttpMethod, HttpRequest, StreamingResponse};

const SLEEP_SLICE: Duration = Duration::from_millis(25);

/// Shared flag a caller flips to abandon an in-flight call.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cancellation and deadline for one call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub deadline: Option<Instant>,
    pub cancel: Option<CancellationToken>,
}

impl CallContext {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Time left before the deadline, if there is one.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn check(&self) -> Result<(), ApiError> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(ApiError::Cancelled);
        }
        if self.remaining() == Some(Duration::ZERO) {
            return Err(ApiError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Sleep for `duration`, waking early to report cancellation or an
    /// expired deadline.
    pub fn sleep(&self, duration: Duration) -> Result<(), ApiError> {
        let until = Instant::now() + duration;
        loop {
            self.check()?;
            let now = Instant::now();
            if now >= until {
                return Ok(());
            }
            let mut slice = (until - now).min(SLEEP_SLICE);
            if let Some(remaining) = self.remaining() {
                slice = slice.min(remaining);
            }
            thread::sleep(slice);
        }
    }
}

/// Executes a single HTTP exchange.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &HttpRequest,
        context: &CallContext,
    ) -> Result<StreamingResponse, TransportError>;
}

/// Blocking transport on a shared `ureq` agent (and its connection pool).
///
/// Non-2xx statuses are returned as data rather than errors, leaving status
/// interpretation to the client.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn send(
        &self,
        request: &HttpRequest,
        context: &CallContext,
    ) -> Result<StreamingResponse, TransportError> {
        let timeout = context.remaining();
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => prepare(self.agent.get(&request.url), request, timeout).call(),
            HttpMethod::Delete => {
                let builder = prepare(self.agent.delete(&request.url), request, timeout);
                match body {
                    Some(bytes) => builder.force_send_body().send(bytes),
                    None => builder.call(),
                }
            }
            HttpMethod::Post => send_with_body(
                prepare(self.agent.post(&request.url), request, timeout),
                body,
            ),
            HttpMethod::Patch => send_with_body(
                prepare(self.agent.patch(&request.url), request, timeout),
                body,
            ),
        };

        let response = result.map_err(map_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();

        Ok(StreamingResponse {
            status,
            headers,
            body: Box::new(response.into_body().into_reader()),
        })
    }
}

fn prepare<B>(
    mut builder: ureq::RequestBuilder<B>,
    request: &HttpRequest,
    timeout: Option<Duration>,
) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    match timeout {
        Some(timeout) => builder.config().timeout_global(Some(timeout)).build(),
        None => builder,
    }
}

fn send_with_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

fn map_error(error: ureq::Error) -> TransportError {
    let message = error.to_string();
    match error {
        ureq::Error::Timeout(_) => TransportError::Timeout(message),
        ureq::Error::Io(_) | ureq::Error::ConnectionFailed | ureq::Error::HostNotFound => {
            TransportError::Connection(message)
        }
        _ => TransportError::Other(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_without_limits_never_fails() {
        let ctx = CallContext::default();
        assert!(ctx.check().is_ok());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn cancelled_context_reports_cancellation() {
        let token = CancellationToken::new();
        let ctx = CallContext::default().with_cancel(token.clone());
        token.cancel();
        assert!(matches!(ctx.check(), Err(ApiError::Cancelled)));
        assert!(matches!(ctx.sleep(Duration::from_secs(10)), Err(ApiError::Cancelled)));
    }

    #[test]
    fn sleep_stops_at_deadline() {
        let ctx = CallContext::with_timeout(Duration::from_millis(30));
        let started = Instant::now();
        let result = ctx.sleep(Duration::from_secs(10));
        assert!(matches!(result, Err(ApiError::DeadlineExceeded)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn sleep_returns_after_duration() {
        let ctx = CallContext::default();
        assert!(ctx.sleep(Duration::from_millis(5)).is_ok());
    }
}
