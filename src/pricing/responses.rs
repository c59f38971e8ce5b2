//! Response DTOs for pricing API endpoints.
//!
//! Prices and profits are rounded to 2 decimal places (banker's rounding)
//! at this boundary; the calculator itself keeps full precision.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::{round_money, ChannelPrices, CostBreakdown, PricingResult};

/// Per-channel price breakdown in the response.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelPriceBreakdown {
    pub channel: String,
    pub fee_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ideal_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub premium_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_per_unit_ideal: Decimal,
}

impl From<&ChannelPrices> for ChannelPriceBreakdown {
    fn from(channel: &ChannelPrices) -> Self {
        Self {
            channel: channel.channel.clone(),
            fee_percentage: channel.fee_percentage,
            minimum_price: round_money(channel.minimum_price, 2),
            ideal_price: round_money(channel.ideal_price, 2),
            premium_price: round_money(channel.premium_price, 2),
            profit_per_unit_ideal: round_money(channel.profit_per_unit_ideal, 2),
        }
    }
}

/// Cost breakdown section of the response.
#[derive(Debug, Clone, Serialize)]
pub struct CostBreakdownResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub cost_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub variable_costs: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub additional_fees: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub variable_cost_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fixed_costs_allocated: Decimal,
    pub tax_percentage: Decimal,
    pub desired_margin_percentage: Decimal,
}

impl From<&CostBreakdown> for CostBreakdownResponse {
    fn from(breakdown: &CostBreakdown) -> Self {
        Self {
            cost_price: round_money(breakdown.cost_price, 2),
            variable_costs: round_money(breakdown.variable_costs, 2),
            additional_fees: round_money(breakdown.additional_fees, 2),
            variable_cost_total: round_money(breakdown.variable_cost_total, 2),
            fixed_costs_allocated: round_money(breakdown.fixed_costs_allocated, 2),
            tax_percentage: breakdown.tax_percentage,
            desired_margin_percentage: breakdown.desired_margin_percentage,
        }
    }
}

/// Full price calculation response.
#[derive(Debug, Clone, Serialize)]
pub struct PriceCalculationResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ideal_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub premium_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_per_unit_minimum: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_per_unit_ideal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_per_unit_premium: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub break_even_units: Option<Decimal>,
    pub channel_breakdown: Vec<ChannelPriceBreakdown>,
    pub cost_breakdown: CostBreakdownResponse,
}

impl From<&PricingResult> for PriceCalculationResponse {
    fn from(result: &PricingResult) -> Self {
        Self {
            minimum_price: round_money(result.minimum_price, 2),
            ideal_price: round_money(result.ideal_price, 2),
            premium_price: round_money(result.premium_price, 2),
            profit_per_unit_minimum: round_money(result.profit_per_unit_minimum, 2),
            profit_per_unit_ideal: round_money(result.profit_per_unit_ideal, 2),
            profit_per_unit_premium: round_money(result.profit_per_unit_premium, 2),
            break_even_units: result.break_even_units.map(|units| round_money(units, 2)),
            channel_breakdown: result.per_channel.iter().map(Into::into).collect(),
            cost_breakdown: (&result.cost_breakdown).into(),
        }
    }
}
