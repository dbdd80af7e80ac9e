//! Request authentication.
//!
//! Credentials are supplied from outside the client; an `Authenticator`
//! only decorates an already built request.

use std::fmt;

use crate::error::ApiError;
use crate::http::HttpRequest;

pub trait Authenticator: fmt::Debug + Send + Sync {
    /// Short identifier, matching the `<SERVICE>_AUTH_TYPE` value.
    fn kind(&self) -> &'static str;

    fn authenticate(&self, request: &mut HttpRequest) -> Result<(), ApiError>;
}

/// Sends requests without credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authenticator for NoAuth {
    fn kind(&self) -> &'static str {
        "noauth"
    }

    fn authenticate(&self, _request: &mut HttpRequest) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Adds `Authorization: Bearer <token>` to every request.
#[derive(Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken").field("token", &"<redacted>").finish()
    }
}

impl Authenticator for BearerToken {
    fn kind(&self) -> &'static str {
        "bearertoken"
    }

    fn authenticate(&self, request: &mut HttpRequest) -> Result<(), ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::Authentication("bearer token is empty".to_string()));
        }
        request.set_header("Authorization", &format!("Bearer {}", self.token));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: "https://lakehouse/api/v1/ready".to_string(),
            headers: vec![("authorization".to_string(), "stale".to_string())],
            body: None,
        }
    }

    #[test]
    fn bearer_token_sets_authorization() {
        let mut req = request();
        BearerToken::new("abc").authenticate(&mut req).unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn bearer_token_is_redacted_in_debug() {
        let debug = format!("{:?}", BearerToken::new("abc"));
        assert!(!debug.contains("abc"));
    }

    #[test]
    fn empty_token_is_an_error() {
        let err = BearerToken::new("").authenticate(&mut request()).unwrap_err();
        assert!(matches!(err, ApiError::Authentication(_)));
    }
}
