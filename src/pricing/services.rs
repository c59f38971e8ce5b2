//! Pricing service functions with database access.
//!
//! These load a stored product (cache first, then Postgres) and feed its
//! cost data into the pure calculator.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::AppCache;
use crate::error::AppError;
use crate::products::queries;

use super::calculators::PricingResult;

/// Calculate prices for a stored product.
///
/// The product's cost columns and stored sales channels become the
/// calculation input; `premium_factor` comes from the request since it is
/// not persisted per product.
pub async fn calculate_for_product(
    pool: &PgPool,
    cache: &AppCache,
    product_id: i64,
    premium_factor: Decimal,
) -> Result<PricingResult, AppError> {
    let product = if let Some(cached) = cache.products.get(&product_id).await {
        tracing::debug!(product_id, "cache hit for product");
        cached
    } else {
        tracing::debug!(product_id, "cache miss for product");
        let product = queries::get_product(pool, product_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let product = Arc::new(product);
        cache.products.insert(product_id, product.clone()).await;
        product
    };

    let input = product.pricing_input(premium_factor)?;
    Ok(input.compute()?)
}
