//! Health check route handlers

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::cache::CacheStats;
use crate::AppState;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/health", get(health))
        .route("/health/cache", get(cache_stats))
}

/// Simple liveness probe.
async fn liveness() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "app": APP_NAME,
        "version": APP_VERSION,
    }))
}

/// Health check including dependency status.
async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            "error"
        }
    };

    Json(json!({
        "status": if database == "ok" { "ok" } else { "degraded" },
        "app": APP_NAME,
        "version": APP_VERSION,
        "database": database,
    }))
}

/// Cache statistics for monitoring.
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
