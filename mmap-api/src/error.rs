//! Request-level errors and their JSON responses.
//!
//! Every failure a handler can hit is recovered into a status code and a
//! `{"error": "..."}` body. Store failures are logged here and reported
//! without internal detail.

use axum::{
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Errors returned from the Auth Gate and route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized. Add header x-demo-token or Authorization: Bearer <token>")]
    Unauthorized,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Missing school_id")]
    MissingSchoolId,

    #[error("Student not found")]
    StudentNotFound,

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Body(#[from] BytesRejection),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ApiError::MissingSchoolId => StatusCode::BAD_REQUEST,
            ApiError::StudentNotFound | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Store(e) => {
                error!(error = %e, "store_query_failed");
                "Internal server error".to_string()
            }
            ApiError::Body(rejection) => rejection.body_text(),
            other => other.to_string(),
        };

        (self.status(), Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_client_errors() {
        let (status, body) = body_json(ApiError::MissingSchoolId).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Missing school_id"}));

        let (status, body) = body_json(ApiError::InvalidSignature).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid signature");

        let (status, body) = body_json(ApiError::Unauthorized).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().starts_with("Unauthorized"));

        let (status, _) = body_json(ApiError::StudentNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = body_json(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({"error": "Not found"}));

        let (status, body) = body_json(ApiError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, serde_json::json!({"error": "Method not allowed"}));
    }

    #[tokio::test]
    async fn test_store_error_hides_detail() {
        let err = ApiError::from(StoreError::Query(sqlx::Error::PoolTimedOut));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }
}
