//! Configuration module for environment variable parsing.
//!
//! All secrets and connection settings are read once at startup into a
//! [`Config`], which is then shared read-only with the request pipeline.

use std::env;
use std::num::NonZeroU32;

use thiserror::Error;
use tracing::warn;

const DEFAULT_DATABASE_MAX_CONNECTIONS: NonZeroU32 = NonZeroU32::MIN.saturating_add(9);

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {name} is not set")]
    MissingVar { name: &'static str },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret expected in the `x-demo-token` header
    pub demo_token: String,

    /// Secret expected after `Authorization: Bearer `; bearer auth is off when unset
    pub bearer_token: Option<String>,

    /// HMAC-SHA256 key for `/lovable-webhook` signatures
    pub webhook_secret: Option<String>,

    /// Postgres connection string; the in-memory demo store is used when unset
    pub database_url: Option<String>,

    /// Upper bound on pooled database connections; zero is rejected at parse time
    pub database_max_connections: NonZeroU32,

    /// Port for the web server to listen on
    pub port: u16,

    /// Name reported by `/` and `/health`
    pub service_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as missing ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Ok(Config {
            demo_token: var("DEMO_TOKEN").ok_or(ConfigError::MissingVar { name: "DEMO_TOKEN" })?,

            bearer_token: var("API_BEARER_TOKEN"),

            webhook_secret: var("LOVABLE_WEBHOOK_SECRET"),

            database_url: var("DATABASE_URL"),

            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                var("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            ),

            port: parse_or("PORT", var("PORT"), 4000),

            service_name: var("SERVICE_NAME").unwrap_or_else(|| "MMAP API".to_string()),
        })
    }

    /// Whether bearer-token authentication can ever succeed.
    pub fn bearer_auth_enabled(&self) -> bool {
        self.bearer_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Parse a numeric option, falling back to `default` when unset or invalid.
fn parse_or<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}
