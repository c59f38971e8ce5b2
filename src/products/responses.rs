//! Response DTOs for product endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::SalesChannel;

use super::models::Product;

/// Product as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    pub cost_price: Decimal,
    pub tax_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub variable_costs: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub fixed_costs_allocated: Decimal,
    pub sales_channels: Vec<SalesChannel>,
    #[serde(with = "rust_decimal::serde::str")]
    pub additional_fees: Decimal,
    pub desired_margin_percentage: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<Product> for ProductResponse {
    type Error = serde_json::Error;

    fn try_from(product: Product) -> Result<Self, Self::Error> {
        let sales_channels = product.channels()?;
        Ok(Self {
            id: product.id,
            name: product.name,
            category: product.category,
            description: product.description,
            cost_price: product.cost_price,
            tax_percentage: product.tax_percentage,
            variable_costs: product.variable_costs,
            fixed_costs_allocated: product.fixed_costs_allocated,
            sales_channels,
            additional_fees: product.additional_fees,
            desired_margin_percentage: product.desired_margin_percentage,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

/// Paginated product listing.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
    pub products: Vec<ProductResponse>,
}
