//! MMAP API - student records behind a shared-secret gate.
//!
//! ## Request flow
//!
//! ```text
//! Request → CORS → Auth Gate → Handler → StudentStore
//!                      └─ /health, /lovable-webhook bypass (webhook verifies HMAC)
//! ```

pub mod config;
pub mod demo;
pub mod error;
pub mod store;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use store::{MemoryStudentStore, PgStudentStore, Student, StoreError, StudentStore};
pub use web::{router, AppState};
