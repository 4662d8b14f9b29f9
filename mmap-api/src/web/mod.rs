//! HTTP surface.
//!
//! Requests flow through the Auth Gate ([`auth`]) into the handlers. The
//! webhook route bypasses the gate and authenticates with an HMAC signature
//! ([`signature`]) computed over the raw body captured by [`body`].

pub mod auth;
pub mod body;
pub mod handlers;
pub mod router;
pub mod signature;

pub use auth::{evaluate, require_auth, Admission};
pub use body::CapturedBody;
pub use handlers::{
    assessment_plan, demo_students, health, lovable_webhook, method_not_allowed, not_found,
    routes, status, students_db, AppState, HealthResponse, StudentsResponse, WebhookResponse,
};
pub use router::router;
pub use signature::{select_signature_header, sign_payload, verify_signature};
