//! Client configuration.
//!
//! A `ClientConfig` is built once and shared read-only by every call made
//! through a client. Environment-driven construction goes through
//! `from_lookup` so it can be exercised without touching the process
//! environment.

use std::time::Duration;

use crate::auth::{Authenticator, BearerToken, NoAuth};
use crate::error::ConfigError;

pub const DEFAULT_SERVICE_URL: &str = "https://lakehouse/api/v1";
pub const DEFAULT_SERVICE_NAME: &str = "lakehouse";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_MAX_RETRIES: u32 = 4;
const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(30);

/// Bounded exponential backoff. Retries are off unless a policy is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_interval: DEFAULT_INITIAL_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (zero-based), doubling each time
    /// and capped at `max_interval`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(31)).unwrap_or(u32::MAX);
        self.initial_interval
            .checked_mul(factor)
            .unwrap_or(self.max_interval)
            .min(self.max_interval)
    }

    /// 429 and 5xx other than 501 are treated as transient.
    pub fn is_retryable_status(status: u16) -> bool {
        status == 429 || (status >= 500 && status != 501)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub service_url: String,
    /// Sent with every request, below per-call headers.
    pub default_headers: Vec<(String, String)>,
    pub enable_gzip: bool,
    pub retry: Option<RetryPolicy>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            default_headers: Vec::new(),
            enable_gzip: false,
            retry: None,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

/// Settings read from the environment: client configuration plus the
/// authenticator it names.
#[derive(Debug)]
pub struct EnvSettings {
    pub config: ClientConfig,
    pub authenticator: Box<dyn Authenticator>,
}

impl ClientConfig {
    pub fn new(service_url: &str) -> Self {
        Self {
            service_url: service_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_retries(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn with_gzip(mut self, enabled: bool) -> Self {
        self.enable_gzip = enabled;
        self
    }

    pub fn with_default_header(mut self, name: &str, value: &str) -> Self {
        crate::http::set_header(&mut self.default_headers, name, value);
        self
    }

    /// Read `<SERVICE>_*` variables from the process environment.
    pub fn from_env(service_name: &str) -> Result<EnvSettings, ConfigError> {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// Recognised keys (prefix is the upper-cased service name):
    /// `_URL`, `_ENABLE_GZIP`, `_ENABLE_RETRIES`, `_MAX_RETRIES`,
    /// `_RETRY_INTERVAL`, `_TIMEOUT`, `_AUTH_TYPE`, `_BEARER_TOKEN`.
    pub fn from_lookup<F>(service_name: &str, lookup: F) -> Result<EnvSettings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = service_name.to_ascii_uppercase().replace('-', "_");
        let get = |suffix: &str| {
            let key = format!("{prefix}_{suffix}");
            lookup(&key).map(|value| (key, value))
        };

        let mut config = ClientConfig::default();
        if let Some((key, url)) = get("URL") {
            if url::Url::parse(&url).is_err() {
                return Err(ConfigError::InvalidValue { key, value: url });
            }
            config.service_url = url;
        }
        if let Some((key, value)) = get("ENABLE_GZIP") {
            config.enable_gzip = parse_bool(&key, &value)?;
        }
        if let Some((key, value)) = get("ENABLE_RETRIES") {
            if parse_bool(&key, &value)? {
                let mut policy = RetryPolicy::default();
                if let Some((key, value)) = get("MAX_RETRIES") {
                    policy.max_retries = parse_number(&key, &value)?;
                }
                if let Some((key, value)) = get("RETRY_INTERVAL") {
                    policy.max_interval = Duration::from_secs(parse_number(&key, &value)?.into());
                }
                config.retry = Some(policy);
            }
        }
        if let Some((key, value)) = get("TIMEOUT") {
            let seconds: u32 = parse_number(&key, &value)?;
            config.timeout = (seconds > 0).then(|| Duration::from_secs(seconds.into()));
        }

        let auth_type = get("AUTH_TYPE").map(|(_, value)| value.to_ascii_lowercase());
        let authenticator: Box<dyn Authenticator> = match auth_type.as_deref() {
            None | Some("noauth") => Box::new(NoAuth),
            Some("bearertoken") => {
                let key = format!("{prefix}_BEARER_TOKEN");
                match lookup(&key) {
                    Some(token) if !token.is_empty() => Box::new(BearerToken::new(&token)),
                    _ => return Err(ConfigError::MissingBearerToken(key)),
                }
            }
            Some(other) => return Err(ConfigError::UnsupportedAuthType(other.to_string())),
        };

        Ok(EnvSettings {
            config,
            authenticator,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
