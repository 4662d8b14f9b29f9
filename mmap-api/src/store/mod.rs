//! Student record storage.
//!
//! Handlers only see the [`StudentStore`] trait. Production deployments use
//! [`PgStudentStore`]; [`MemoryStudentStore`] backs tests and database-less
//! demo runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryStudentStore;
pub use postgres::PgStudentStore;

/// Maximum number of rows returned by a single roster query.
pub const STUDENT_ROW_LIMIT: usize = 500;

/// A student row as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub classroom_id: Option<String>,
    pub dob: Option<String>,
}

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Read access to the student roster.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// List up to `limit` students of a school, ordered by last name ascending.
    async fn list_by_school(&self, school_id: &str, limit: usize)
        -> Result<Vec<Student>, StoreError>;
}
