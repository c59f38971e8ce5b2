//! Request DTOs for product endpoints.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::pricing::SalesChannel;

/// Request to create a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub cost_price: Decimal,
    #[serde(default)]
    pub tax_percentage: Decimal,
    #[serde(default)]
    pub variable_costs: Decimal,
    #[serde(default)]
    pub fixed_costs_allocated: Decimal,
    #[serde(default)]
    pub sales_channels: Option<Vec<SalesChannel>>,
    #[serde(default)]
    pub additional_fees: Decimal,
    #[serde(default = "default_margin")]
    pub desired_margin_percentage: Decimal,
}

fn default_margin() -> Decimal {
    dec!(30)
}

/// Request to update a product. Every field is optional; absent fields are
/// left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cost_price: Option<Decimal>,
    pub tax_percentage: Option<Decimal>,
    pub variable_costs: Option<Decimal>,
    pub fixed_costs_allocated: Option<Decimal>,
    pub sales_channels: Option<Vec<SalesChannel>>,
    pub additional_fees: Option<Decimal>,
    pub desired_margin_percentage: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Query parameters for product listing.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

fn default_limit() -> i64 {
    20
}

pub const MAX_PAGE_SIZE: i64 = 100;

impl ListProductsQuery {
    /// Clamp pagination to sane bounds.
    pub fn normalized(&self) -> (i64, i64) {
        let limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        let skip = self.skip.max(0);
        (limit, skip)
    }
}
