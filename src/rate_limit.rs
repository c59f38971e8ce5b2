//! Fixed-window rate limiting middleware.
//!
//! Counts requests per client in a moka cache whose entry TTL equals the
//! window length, so counters reset when the window expires. The client key
//! is the first `x-forwarded-for` hop when present (service runs behind a
//! proxy), otherwise the peer address.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::AppError;
use crate::AppState;

pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&request);

    let counter = state
        .cache
        .rate_counters
        .get_with(key.clone(), async { Arc::new(AtomicU64::new(0)) })
        .await;

    let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
    if count > state.config.rate_limit_requests {
        tracing::warn!(client = %key, count, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}

fn client_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::{middleware, routing::get, Router};
    use sqlx::postgres::PgPoolOptions;
    use tower::util::ServiceExt;

    use crate::cache::AppCache;
    use crate::config::Config;

    fn test_state(rate_limit_requests: u64) -> AppState {
        let config = Config {
            rate_limit_requests,
            ..Config::default()
        };
        AppState {
            // Lazy pool: never connects, the limiter does not touch the db.
            db: PgPoolOptions::new()
                .connect_lazy("postgres://localhost:5432/unused")
                .unwrap(),
            cache: AppCache::new(&config),
            config: Arc::new(config),
        }
    }

    fn limited_app(rate_limit_requests: u64) -> Router {
        let state = test_state(rate_limit_requests);
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn_with_state(state, rate_limit))
    }

    fn request_from(client: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri("/ping")
            .header("x-forwarded-for", client)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_requests_within_limit_pass() {
        let app = limited_app(3);

        for _ in 0..3 {
            let response = app.clone().oneshot(request_from("203.0.113.9")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_exceeding_limit_returns_429() {
        let app = limited_app(3);

        for _ in 0..3 {
            let response = app.clone().oneshot(request_from("203.0.113.9")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.clone().oneshot(request_from("203.0.113.9")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        // The window is per client; another client still has budget.
        let response = app.oneshot(request_from("198.51.100.7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_client_key_prefers_forwarded_header() {
        let request = HttpRequest::builder()
            .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_key(&request), "203.0.113.9");
    }

    #[test]
    fn test_client_key_falls_back_to_peer_address() {
        let mut request = HttpRequest::builder().body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo::<SocketAddr>("192.0.2.4:9999".parse().unwrap()));
        assert_eq!(client_key(&request), "192.0.2.4");
    }

    #[test]
    fn test_client_key_unknown_without_peer_info() {
        let request = HttpRequest::builder().body(Body::empty()).unwrap();
        assert_eq!(client_key(&request), "unknown");
    }
}
