//! Postgres-backed student store.

use std::num::NonZeroU32;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::info;

use super::{Student, StoreError, StudentStore};

/// Columns and the `school_id` comparison are cast to text so the query does
/// not depend on the concrete column types of the deployed schema.
const LIST_BY_SCHOOL_SQL: &str = "SELECT id::text AS id, first_name, last_name, \
     classroom_id::text AS classroom_id, dob::text AS dob \
     FROM students \
     WHERE school_id::text = $1 \
     ORDER BY last_name \
     LIMIT $2";

/// Student store backed by a bounded, lazily connected Postgres pool.
#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    /// Build a store for `database_url` without opening any connection yet.
    pub fn connect_lazy(
        database_url: &str,
        max_connections: NonZeroU32,
    ) -> Result<Self, StoreError> {
        let mut options = PgConnectOptions::from_str(database_url)?;
        if requires_tls(database_url) {
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(max_connections.get())
            .connect_lazy_with(options);

        info!(max_connections = max_connections.get(), "postgres_pool_created");

        Ok(Self { pool })
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn list_by_school(
        &self,
        school_id: &str,
        limit: usize,
    ) -> Result<Vec<Student>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, Student>(LIST_BY_SCHOOL_SQL)
            .bind(school_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Hosted Railway databases only accept TLS connections.
fn requires_tls(database_url: &str) -> bool {
    database_url.contains("railway.app")
}
