//! Application configuration from environment variables.
//!
//! Every knob has a development default; `.env` files are honored via
//! dotenvy in `main`.

use anyhow::Context;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Maximum database connections in the pool.
    pub database_max_connections: u32,
    /// Requests allowed per client per window.
    pub rate_limit_requests: u64,
    /// Rate-limit window length in seconds.
    pub rate_limit_window_secs: u64,
    /// Allowed CORS origins, comma separated in the env var.
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/pricepro".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            rate_limit_requests: parse_var("RATE_LIMIT_REQUESTS", 200)?,
            rate_limit_window_secs: parse_var("RATE_LIMIT_WINDOW_SECS", 60)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost:5432/pricepro".to_string(),
            bind_addr: "0.0.0.0:8000".to_string(),
            database_max_connections: 5,
            rate_limit_requests: 200,
            rate_limit_window_secs: 60,
            cors_origins: Vec::new(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("invalid value for {name}: {value}")),
        Err(_) => Ok(default),
    }
}
