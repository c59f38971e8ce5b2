//! Pricing route handlers.

use axum::{
    extract::{Path, Query, State},
    routing::post,
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::calculators::PricingInput;
use super::requests::{CalculatePriceQuery, PriceSimulationRequest};
use super::responses::PriceCalculationResponse;
use super::services;

/// Routes served by the pricing module.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/simulation/calculate", post(calculate_simulation))
        .route("/products/:id/calculate-price", post(calculate_product_price))
}

/// Simulate a price calculation without touching persistence.
async fn calculate_simulation(
    Json(request): Json<PriceSimulationRequest>,
) -> Result<Json<PriceCalculationResponse>> {
    let input = PricingInput::from(request);
    let result = input.compute()?;
    Ok(Json(PriceCalculationResponse::from(&result)))
}

/// Calculate prices for a stored product.
async fn calculate_product_price(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Query(query): Query<CalculatePriceQuery>,
) -> Result<Json<PriceCalculationResponse>> {
    let result = services::calculate_for_product(
        &state.db,
        &state.cache,
        product_id,
        query.premium_factor,
    )
    .await?;
    Ok(Json(PriceCalculationResponse::from(&result)))
}
