//! In-memory caching using moka
//!
//! Two caches: product rows (read-mostly, invalidated on writes) and
//! per-client request counters for the rate limiter. Counter entries expire
//! after the rate-limit window, which is what makes the window fixed.

use moka::future::Cache;
use serde::Serialize;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::products::Product;

/// Application cache holding product rows and rate-limit counters
#[derive(Clone)]
pub struct AppCache {
    /// Products (id -> Product)
    pub products: Cache<i64, Arc<Product>>,
    /// Rate-limit counters (client key -> requests in the current window)
    pub rate_counters: Cache<String, Arc<AtomicU64>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new(config: &Config) -> Self {
        Self {
            // Products: 1000 entries, 10 min TTL, writes invalidate eagerly
            products: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),

            // Counter lifetime is the rate-limit window
            rate_counters: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(Duration::from_secs(config.rate_limit_window_secs))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            products_size: self.products.entry_count(),
            rate_counters_size: self.rate_counters.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.products.invalidate_all();
        self.rate_counters.invalidate_all();
        tracing::info!("All caches invalidated");
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub products_size: u64,
    pub rate_counters_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_reflect_entries() {
        let cache = AppCache::new(&Config::default());
        cache
            .rate_counters
            .insert("10.0.0.1".to_string(), Arc::new(AtomicU64::new(1)))
            .await;
        cache.rate_counters.run_pending_tasks().await;

        assert_eq!(cache.stats().rate_counters_size, 1);
        assert_eq!(cache.stats().products_size, 0);
    }
}
