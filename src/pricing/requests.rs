//! Request DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use super::calculators::{PricingInput, SalesChannel, DEFAULT_PREMIUM_FACTOR};

/// Request to simulate a price calculation without a stored product.
#[derive(Debug, Deserialize)]
pub struct PriceSimulationRequest {
    pub cost_price: Decimal,
    #[serde(default)]
    pub tax_percentage: Decimal,
    #[serde(default)]
    pub variable_costs: Decimal,
    #[serde(default)]
    pub fixed_costs_allocated: Decimal,
    #[serde(default)]
    pub sales_channels: Vec<SalesChannel>,
    #[serde(default)]
    pub additional_fees: Decimal,
    #[serde(default = "default_margin")]
    pub desired_margin_percentage: Decimal,
    #[serde(default = "default_premium_factor")]
    pub premium_factor: Decimal,
}

fn default_margin() -> Decimal {
    dec!(30)
}

fn default_premium_factor() -> Decimal {
    DEFAULT_PREMIUM_FACTOR
}

impl From<PriceSimulationRequest> for PricingInput {
    fn from(request: PriceSimulationRequest) -> Self {
        PricingInput {
            cost_price: request.cost_price,
            variable_costs: request.variable_costs,
            additional_fees: request.additional_fees,
            tax_percentage: request.tax_percentage,
            desired_margin_percentage: request.desired_margin_percentage,
            fixed_costs_allocated: request.fixed_costs_allocated,
            premium_factor: request.premium_factor,
            sales_channels: request.sales_channels,
        }
    }
}

/// Query parameters for product price calculation.
#[derive(Debug, Deserialize)]
pub struct CalculatePriceQuery {
    #[serde(default = "default_premium_factor")]
    pub premium_factor: Decimal,
}
