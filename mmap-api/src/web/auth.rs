//! Request admission.
//!
//! Every request passes through [`require_auth`] before routing. Health
//! checks and the webhook (which verifies its own signature) bypass it;
//! everything else needs the shared demo token or a bearer token.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::web::AppState;
use crate::Config;

pub const DEMO_TOKEN_HEADER: &str = "x-demo-token";
pub const HEALTH_PATH: &str = "/health";
pub const WEBHOOK_PATH: &str = "/lovable-webhook";

const BEARER_PREFIX: &str = "Bearer ";

/// Why a request was let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Public or self-authenticating route
    Bypass,
    /// `x-demo-token` matched
    SharedToken,
    /// `Authorization: Bearer` matched
    BearerToken,
}

/// Decide whether a request may proceed.
///
/// The shared token is checked before the bearer token and the first match
/// wins. Missing or empty credentials never match.
pub fn evaluate(config: &Config, path: &str, headers: &HeaderMap) -> Result<Admission, ApiError> {
    if path == HEALTH_PATH || path.starts_with(WEBHOOK_PATH) {
        return Ok(Admission::Bypass);
    }

    let demo_token = header_str(headers, DEMO_TOKEN_HEADER);
    if let Some(supplied) = demo_token {
        if tokens_match(supplied, &config.demo_token) {
            return Ok(Admission::SharedToken);
        }
    }

    let bearer = header_str(headers, AUTHORIZATION.as_str())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX));
    if let (Some(supplied), Some(expected)) = (bearer, config.bearer_token.as_deref()) {
        if tokens_match(supplied, expected) {
            return Ok(Admission::BearerToken);
        }
    }

    warn!(
        path = %path,
        has_demo_token = demo_token.is_some(),
        has_bearer = bearer.is_some(),
        "auth_rejected"
    );
    Err(ApiError::Unauthorized)
}

/// Middleware enforcing [`evaluate`] in front of every route.
pub async fn require_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match evaluate(&state.config, request.uri().path(), request.headers()) {
        Ok(admission) => {
            debug!(path = %request.uri().path(), admission = ?admission, "auth_admitted");
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Constant-time token comparison. Both sides are hashed first so neither
/// content nor length leaks through timing. Empty values never match.
fn tokens_match(supplied: &str, expected: &str) -> bool {
    if supplied.is_empty() || expected.is_empty() {
        return false;
    }
    let a = Sha256::digest(supplied.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.ct_eq(&b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config(bearer: Option<&str>) -> Config {
        Config {
            demo_token: "letmein".to_string(),
            bearer_token: bearer.map(str::to_string),
            webhook_secret: None,
            database_url: None,
            database_max_connections: std::num::NonZeroU32::MIN,
            port: 0,
            service_name: "test".to_string(),
        }
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn test_bypass_paths() {
        let cfg = config(None);
        let none = HeaderMap::new();
        assert_eq!(evaluate(&cfg, "/health", &none).unwrap(), Admission::Bypass);
        assert_eq!(evaluate(&cfg, "/lovable-webhook", &none).unwrap(), Admission::Bypass);
        assert_eq!(evaluate(&cfg, "/lovable-webhook/v2", &none).unwrap(), Admission::Bypass);
        // Health is an exact match only.
        assert!(evaluate(&cfg, "/health/db", &none).is_err());
        assert!(evaluate(&cfg, "/healthz", &none).is_err());
    }

    #[test]
    fn test_no_credentials_rejected() {
        let cfg = config(Some("bearer-secret"));
        assert!(matches!(
            evaluate(&cfg, "/", &HeaderMap::new()),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn test_shared_token() {
        let cfg = config(None);
        let ok = headers(&[("x-demo-token", "letmein")]);
        assert_eq!(evaluate(&cfg, "/", &ok).unwrap(), Admission::SharedToken);

        let wrong = headers(&[("x-demo-token", "letmein2")]);
        assert!(evaluate(&cfg, "/", &wrong).is_err());

        let empty = headers(&[("x-demo-token", "")]);
        assert!(evaluate(&cfg, "/", &empty).is_err());
    }

    #[test]
    fn test_bearer_token() {
        let cfg = config(Some("bearer-secret"));
        let ok = headers(&[("authorization", "Bearer bearer-secret")]);
        assert_eq!(evaluate(&cfg, "/v1/students", &ok).unwrap(), Admission::BearerToken);

        let wrong = headers(&[("authorization", "Bearer nope")]);
        assert!(evaluate(&cfg, "/v1/students", &wrong).is_err());

        let basic = headers(&[("authorization", "Basic bearer-secret")]);
        assert!(evaluate(&cfg, "/v1/students", &basic).is_err());
    }

    #[test]
    fn test_empty_bearer_never_matches_unset_secret() {
        let ok = headers(&[("authorization", "Bearer ")]);
        assert!(evaluate(&config(None), "/", &ok).is_err());
        assert!(evaluate(&config(Some("")), "/", &ok).is_err());
    }

    #[test]
    fn test_shared_token_checked_first() {
        let cfg = config(Some("bearer-secret"));
        let both = headers(&[
            ("x-demo-token", "letmein"),
            ("authorization", "Bearer bearer-secret"),
        ]);
        assert_eq!(evaluate(&cfg, "/", &both).unwrap(), Admission::SharedToken);

        // A wrong shared token falls through to the bearer check.
        let fallthrough = headers(&[
            ("x-demo-token", "wrong"),
            ("authorization", "Bearer bearer-secret"),
        ]);
        assert_eq!(evaluate(&cfg, "/", &fallthrough).unwrap(), Admission::BearerToken);
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("abc", "abc"));
        assert!(!tokens_match("abc", "abd"));
        assert!(!tokens_match("abc", "abcd"));
        assert!(!tokens_match("", ""));
    }
}
