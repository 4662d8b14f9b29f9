//! Route handlers.
//!
//! Handlers run after the Auth Gate has admitted the request. The webhook is
//! the exception: it is never gated and checks its own signature instead.

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::form_urlencoded;

use crate::demo::{self, AssessmentPlan};
use crate::error::ApiError;
use crate::store::{Student, StudentStore, STUDENT_ROW_LIMIT};
use crate::web::body::CapturedBody;
use crate::web::router::ROUTES;
use crate::web::signature::{select_signature_header, verify_signature};
use crate::Config;

pub const SCHOOL_ID_HEADER: &str = "x-school-id";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn StudentStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn StudentStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

// =============================================================================
// Health & Status
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub timestamp: String,
}

/// Health check endpoint. Public.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        service: state.config.service_name.clone(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: String,
}

/// Authenticated liveness endpoint.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        service: state.config.service_name.clone(),
    })
}

#[derive(Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<String>,
}

/// Debug listing of the registered routes.
pub async fn routes() -> Json<RoutesResponse> {
    Json(RoutesResponse {
        routes: ROUTES
            .iter()
            .map(|(method, path)| format!("{} {}", method, path))
            .collect(),
    })
}

// =============================================================================
// Students
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentsResponse {
    pub students: Vec<Student>,
}

/// Demo roster endpoint.
pub async fn demo_students() -> Json<StudentsResponse> {
    Json(StudentsResponse {
        students: demo::demo_students(),
    })
}

/// Students of one school from the store.
///
/// The school comes from the `x-school-id` header, falling back to the first
/// `school_id` query parameter. Empty values count as missing. The query
/// string is only read when the header is absent, and never rejects.
pub async fn students_db(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Json<StudentsResponse>, ApiError> {
    let school_id = headers
        .get(SCHOOL_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| query.as_deref().and_then(school_id_param))
        .ok_or(ApiError::MissingSchoolId)?;

    let students = state
        .store
        .list_by_school(&school_id, STUDENT_ROW_LIMIT)
        .await?;

    info!(school_id = %school_id, rows = students.len(), "students_db_query");

    Ok(Json(StudentsResponse { students }))
}

/// First `school_id` value of a raw query string, if it is non-empty.
fn school_id_param(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "school_id")
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty())
}

/// JSON 404 for paths with no route.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// JSON 405 for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Assessment plan for a demo student.
pub async fn assessment_plan(
    Path(student_id): Path<String>,
) -> Result<Json<AssessmentPlan>, ApiError> {
    match demo::assessment_plan(&student_id) {
        Some(plan) => Ok(Json(plan)),
        None => {
            warn!(student_id = %student_id, "assessment_student_not_found");
            Err(ApiError::StudentNotFound)
        }
    }
}

// =============================================================================
// Lovable Webhook
// =============================================================================

#[derive(Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
}

/// Lovable webhook endpoint.
///
/// This endpoint:
/// 1. Picks the signature from the first present signature header
/// 2. Verifies it against the exact received bytes
/// 3. Acknowledges with `{"ok": true}`
pub async fn lovable_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: CapturedBody,
) -> Result<Json<WebhookResponse>, ApiError> {
    let signature = select_signature_header(&headers);

    info!(
        body_length = body.raw().len(),
        has_signature = signature.is_some(),
        "lovable_webhook_received"
    );

    if !verify_signature(body.raw(), signature, state.config.webhook_secret.as_deref()) {
        warn!("lovable_webhook_signature_invalid");
        return Err(ApiError::InvalidSignature);
    }

    let event = body
        .json()
        .get("event")
        .or_else(|| body.json().get("type"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");

    info!(event = %event, "lovable_webhook_accepted");

    Ok(Json(WebhookResponse { ok: true }))
}
