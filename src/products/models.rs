//! Database model for products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::pricing::{PricingInput, SalesChannel};

/// Product row from the `products` table.
///
/// Holds everything a price calculation needs: costs, tax, fees, the
/// desired margin and the sales channels the product is sold through.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub cost_price: Decimal,
    pub tax_percentage: Decimal,
    pub variable_costs: Decimal,
    pub fixed_costs_allocated: Decimal,
    /// JSONB array of `{channel, fee_percentage}` objects, nullable.
    pub sales_channels: Option<serde_json::Value>,
    pub additional_fees: Decimal,
    pub desired_margin_percentage: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Decode the stored sales channels. `NULL` means no channels.
    pub fn channels(&self) -> Result<Vec<SalesChannel>, serde_json::Error> {
        match &self.sales_channels {
            Some(value) => serde_json::from_value(value.clone()),
            None => Ok(Vec::new()),
        }
    }

    /// Map this product's cost data to a calculation input.
    pub fn pricing_input(
        &self,
        premium_factor: Decimal,
    ) -> Result<PricingInput, serde_json::Error> {
        Ok(PricingInput {
            cost_price: self.cost_price,
            variable_costs: self.variable_costs,
            additional_fees: self.additional_fees,
            tax_percentage: self.tax_percentage,
            desired_margin_percentage: self.desired_margin_percentage,
            fixed_costs_allocated: self.fixed_costs_allocated,
            premium_factor,
            sales_channels: self.channels()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample_product(sales_channels: Option<serde_json::Value>) -> Product {
        Product {
            id: 1,
            name: "Artisan candle".to_string(),
            category: Some("Home".to_string()),
            description: None,
            cost_price: dec!(50),
            tax_percentage: dec!(15),
            variable_costs: dec!(5),
            fixed_costs_allocated: dec!(1000),
            sales_channels,
            additional_fees: dec!(3),
            desired_margin_percentage: dec!(30),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_channels_from_jsonb() {
        let product = sample_product(Some(json!([
            {"channel": "Storefront", "fee_percentage": "0"},
            {"channel": "Marketplace", "fee_percentage": "15"}
        ])));

        let channels = product.channels().unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[1].channel, "Marketplace");
        assert_eq!(channels[1].fee_percentage, dec!(15));
    }

    #[test]
    fn test_channels_null_column_is_empty() {
        let product = sample_product(None);
        assert!(product.channels().unwrap().is_empty());
    }

    #[test]
    fn test_channels_rejects_corrupt_data() {
        let product = sample_product(Some(json!({"not": "a list"})));
        assert!(product.channels().is_err());
    }

    #[test]
    fn test_pricing_input_carries_cost_columns() {
        let product = sample_product(None);
        let input = product.pricing_input(dec!(1.3)).unwrap();

        let result = input.compute().unwrap();
        assert_eq!(result.variable_cost_total, dec!(58));
        assert!(result.break_even_units.is_some());
    }
}
