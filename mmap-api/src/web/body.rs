//! Raw body capture.
//!
//! Signature checks need the exact bytes that were sent, while handlers want
//! a parsed document. [`CapturedBody`] reads the body once and keeps both.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ApiError;

/// Request body as received, plus a best-effort JSON parse of it.
#[derive(Debug, Clone)]
pub struct CapturedBody {
    raw: Bytes,
    json: Value,
}

impl CapturedBody {
    /// Capture `raw` and parse it. Content that is not JSON, including an
    /// empty body, parses to an empty object.
    pub fn capture(raw: Bytes) -> Self {
        let json = if raw.is_empty() {
            empty_object()
        } else {
            serde_json::from_slice(&raw).unwrap_or_else(|e| {
                debug!(error = %e, body_length = raw.len(), "body_not_json");
                empty_object()
            })
        };

        Self { raw, json }
    }

    /// The unmodified bytes of the request body.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The parsed body.
    pub fn json(&self) -> &Value {
        &self.json
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

#[async_trait]
impl<S> FromRequest<S> for CapturedBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Declared content type is ignored; only a failed read is fatal.
        let raw = Bytes::from_request(req, state).await?;
        Ok(Self::capture(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde_json::json;

    #[test]
    fn test_capture_json() {
        let body = CapturedBody::capture(Bytes::from_static(br#"{"event":"ping"}"#));
        assert_eq!(body.raw(), br#"{"event":"ping"}"#);
        assert_eq!(body.json(), &json!({"event": "ping"}));
    }

    #[test]
    fn test_capture_preserves_exact_bytes() {
        let wire = b"{ \"a\" :  1 ,\n\"b\":[ ] }\r\n";
        let body = CapturedBody::capture(Bytes::from_static(wire));
        assert_eq!(body.raw(), wire);
        assert_eq!(body.json(), &json!({"a": 1, "b": []}));
    }

    #[test]
    fn test_capture_malformed() {
        let body = CapturedBody::capture(Bytes::from_static(b"event=ping&x=1"));
        assert_eq!(body.raw(), b"event=ping&x=1");
        assert_eq!(body.json(), &json!({}));
    }

    #[test]
    fn test_capture_empty() {
        let body = CapturedBody::capture(Bytes::new());
        assert!(body.raw().is_empty());
        assert_eq!(body.json(), &json!({}));
    }

    #[tokio::test]
    async fn test_extract_ignores_content_type() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "text/plain")
            .body(Body::from(r#"{"event":"ping"}"#))
            .unwrap();

        let body = CapturedBody::from_request(req, &()).await.unwrap();
        assert_eq!(body.json()["event"], "ping");
    }
}
