//! PricePro API - pricing backend for small businesses.
//!
//! Stores product cost data and computes sale price recommendations
//! (minimum, ideal, premium, per-channel adjusted prices and break-even
//! units) from a handful of linear formulas.
//!
//! # Modules
//!
//! - **pricing**: the pure calculation core plus its HTTP endpoints
//! - **products**: CRUD over the cost data the calculator consumes
//! - **cache**: moka-backed product cache and rate-limit counters
//! - **rate_limit**: fixed-window per-client limiting middleware

use axum::{http::HeaderValue, middleware, Router};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;
pub mod products;
pub mod rate_limit;
pub mod routes;

use cache::AppCache;
use config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub config: Arc<Config>,
}

/// Build the application router.
///
/// Rate limiting covers the API routes only; health checks stay unmetered
/// so probes cannot starve real traffic of their budget.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(products::router())
        .merge(pricing::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit,
        ));

    Router::new()
        .merge(routes::health::router())
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins(config)))
        .allow_methods(Any)
        .allow_headers(Any)
}

fn allowed_origins(config: &Config) -> Vec<HeaderValue> {
    config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins_skips_malformed_entries() {
        let config = Config {
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "not a\nvalid origin".to_string(),
                "https://app.example.com".to_string(),
            ],
            ..Config::default()
        };

        let origins = allowed_origins(&config);
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:3000");
        assert_eq!(origins[1], "https://app.example.com");
    }
}
