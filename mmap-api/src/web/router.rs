//! Router assembly.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::web::auth::require_auth;
use crate::web::handlers::{
    assessment_plan, demo_students, health, lovable_webhook, method_not_allowed, not_found,
    routes, status, students_db,
};
use crate::web::AppState;

/// Registered routes, as reported by `/__routes`.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/health"),
    ("GET", "/"),
    ("GET", "/__routes"),
    ("GET", "/v1/students"),
    ("GET", "/v1/students-db"),
    ("POST", "/v1/assessments/:student_id/plan"),
    ("POST", "/lovable-webhook"),
];

/// Build the application router.
///
/// Layer order, outermost first: tracing, CORS (so preflights never hit the
/// gate), then the Auth Gate over every route including the 404 fallback.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/health", get(health))
        .route("/", get(status))
        .route("/__routes", get(routes))
        .route("/v1/students", get(demo_students))
        .route("/v1/students-db", get(students_db))
        .route("/v1/assessments/:student_id/plan", post(assessment_plan))
        .route("/lovable-webhook", post(lovable_webhook))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
