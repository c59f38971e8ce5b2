//! Core pricing calculation functions.
//!
//! Pure pricing math - no database access. Given a validated cost/margin
//! record, produces minimum, ideal and premium price recommendations plus
//! per-channel adjustments and a break-even estimate.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Multiplier applied to the ideal price when no premium factor is given.
pub const DEFAULT_PREMIUM_FACTOR: Decimal = dec!(1.3);

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use pricepro_api::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// A sales venue and the percentage it deducts from gross revenue.
///
/// Stored as JSONB on products and accepted inline in simulation requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesChannel {
    pub channel: String,
    #[serde(default)]
    pub fee_percentage: Decimal,
}

/// Validation failure for a pricing calculation.
///
/// Carries the offending field and the reason the calculation was rejected.
/// The calculation is rejected wholesale; no partial results are produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid pricing input: {field}: {reason}")]
pub struct InvalidPricingInput {
    pub field: &'static str,
    pub reason: String,
}

impl InvalidPricingInput {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Cost and margin inputs for one pricing calculation.
///
/// All percentages are expressed in the 0-100 range, not as ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingInput {
    /// Per-unit production or purchase cost.
    pub cost_price: Decimal,
    /// Per-unit variable expense.
    pub variable_costs: Decimal,
    /// Per-unit extra fees (card machine, packaging, etc.).
    pub additional_fees: Decimal,
    /// Sales tax rate, `[0, 100)`.
    pub tax_percentage: Decimal,
    /// Target profit margin as a percentage of final sale price, `[0, 100)`.
    /// Constrained so `tax_percentage + desired_margin_percentage < 100`.
    pub desired_margin_percentage: Decimal,
    /// Monthly fixed cost share, used only for break-even.
    pub fixed_costs_allocated: Decimal,
    /// Multiplier for the premium price, `> 0`.
    pub premium_factor: Decimal,
    /// Sales channels to compute adjusted prices for, in request order.
    pub sales_channels: Vec<SalesChannel>,
}

/// Per-channel adjusted prices.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPrices {
    pub channel: String,
    pub fee_percentage: Decimal,
    pub minimum_price: Decimal,
    pub ideal_price: Decimal,
    pub premium_price: Decimal,
    pub profit_per_unit_ideal: Decimal,
}

/// Breakdown of the costs that went into a calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub cost_price: Decimal,
    pub variable_costs: Decimal,
    pub additional_fees: Decimal,
    pub variable_cost_total: Decimal,
    pub fixed_costs_allocated: Decimal,
    pub tax_percentage: Decimal,
    pub desired_margin_percentage: Decimal,
}

/// Result of a pricing calculation. Derived from [`PricingInput`] only.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    pub variable_cost_total: Decimal,
    pub minimum_price: Decimal,
    pub ideal_price: Decimal,
    pub premium_price: Decimal,
    pub profit_per_unit_minimum: Decimal,
    pub profit_per_unit_ideal: Decimal,
    pub profit_per_unit_premium: Decimal,
    /// `None` when no fixed costs are allocated.
    pub break_even_units: Option<Decimal>,
    pub per_channel: Vec<ChannelPrices>,
    pub cost_breakdown: CostBreakdown,
}

const HUNDRED: Decimal = dec!(100);

impl PricingInput {
    /// Check every field before any computation happens.
    ///
    /// Rejects negative costs, out-of-range percentages, a tax + margin sum
    /// that leaves no room for costs, a non-positive premium factor, and
    /// channel fees of 100% or more.
    pub fn validate(&self) -> Result<(), InvalidPricingInput> {
        non_negative("cost_price", self.cost_price)?;
        non_negative("variable_costs", self.variable_costs)?;
        non_negative("additional_fees", self.additional_fees)?;
        non_negative("fixed_costs_allocated", self.fixed_costs_allocated)?;
        percentage("tax_percentage", self.tax_percentage)?;
        percentage("desired_margin_percentage", self.desired_margin_percentage)?;

        if self.tax_percentage + self.desired_margin_percentage >= HUNDRED {
            return Err(InvalidPricingInput::new(
                "desired_margin_percentage",
                format!(
                    "tax ({}) plus margin ({}) must stay below 100%",
                    self.tax_percentage, self.desired_margin_percentage
                ),
            ));
        }

        if self.premium_factor <= Decimal::ZERO {
            return Err(InvalidPricingInput::new(
                "premium_factor",
                format!("must be positive, got {}", self.premium_factor),
            ));
        }

        for channel in &self.sales_channels {
            if channel.fee_percentage < Decimal::ZERO || channel.fee_percentage >= HUNDRED {
                return Err(InvalidPricingInput::new(
                    "sales_channels",
                    format!(
                        "channel '{}' fee must be in [0, 100), got {}",
                        channel.channel, channel.fee_percentage
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Run the full calculation.
    ///
    /// Deterministic and side-effect free; validates first so an error never
    /// leaves a partial result behind.
    ///
    /// # Formulas
    /// 1. `variable_cost_total = cost_price + variable_costs + additional_fees`
    /// 2. `minimum_price = variable_cost_total / (1 - tax/100)`
    /// 3. `ideal_price = variable_cost_total / (1 - tax/100 - margin/100)`
    /// 4. `premium_price = ideal_price * premium_factor`
    /// 5. `profit(p) = p * (1 - tax/100) - variable_cost_total`
    /// 6. `break_even_units = fixed_costs_allocated / profit(ideal_price)`
    /// 7. per channel fee `f`: `adjusted = base / (1 - f/100)`
    pub fn compute(&self) -> Result<PricingResult, InvalidPricingInput> {
        self.validate()?;

        let one = Decimal::ONE;
        let tax_rate = self.tax_percentage / HUNDRED;
        let margin_rate = self.desired_margin_percentage / HUNDRED;

        let variable_cost_total = self.cost_price + self.variable_costs + self.additional_fees;

        // Denominators are strictly positive after validation.
        let minimum_price = variable_cost_total / (one - tax_rate);
        let ideal_price = variable_cost_total / (one - tax_rate - margin_rate);
        let premium_price = ideal_price * self.premium_factor;

        let profit = |price: Decimal| price * (one - tax_rate) - variable_cost_total;
        let profit_per_unit_minimum = profit(minimum_price);
        let profit_per_unit_ideal = profit(ideal_price);
        let profit_per_unit_premium = profit(premium_price);

        // Break-even policy: no fixed costs means no break-even point; fixed
        // costs with zero per-unit profit can never be recovered, which is a
        // rejected input rather than a sentinel.
        let break_even_units = if self.fixed_costs_allocated.is_zero() {
            None
        } else if profit_per_unit_ideal <= Decimal::ZERO {
            return Err(InvalidPricingInput::new(
                "desired_margin_percentage",
                "margin yields no profit per unit; break-even is undefined",
            ));
        } else {
            Some(self.fixed_costs_allocated / profit_per_unit_ideal)
        };

        let per_channel = self
            .sales_channels
            .iter()
            .map(|channel| {
                let fee_rate = channel.fee_percentage / HUNDRED;
                let denominator = one - fee_rate;

                let channel_ideal = ideal_price / denominator;
                // Profit at the channel-adjusted ideal price, net of tax and
                // the channel's cut of gross revenue.
                let channel_profit = channel_ideal
                    - variable_cost_total
                    - channel_ideal * tax_rate
                    - channel_ideal * fee_rate;

                ChannelPrices {
                    channel: channel.channel.clone(),
                    fee_percentage: channel.fee_percentage,
                    minimum_price: minimum_price / denominator,
                    ideal_price: channel_ideal,
                    premium_price: premium_price / denominator,
                    profit_per_unit_ideal: channel_profit,
                }
            })
            .collect();

        Ok(PricingResult {
            variable_cost_total,
            minimum_price,
            ideal_price,
            premium_price,
            profit_per_unit_minimum,
            profit_per_unit_ideal,
            profit_per_unit_premium,
            break_even_units,
            per_channel,
            cost_breakdown: CostBreakdown {
                cost_price: self.cost_price,
                variable_costs: self.variable_costs,
                additional_fees: self.additional_fees,
                variable_cost_total,
                fixed_costs_allocated: self.fixed_costs_allocated,
                tax_percentage: self.tax_percentage,
                desired_margin_percentage: self.desired_margin_percentage,
            },
        })
    }
}

fn non_negative(field: &'static str, value: Decimal) -> Result<(), InvalidPricingInput> {
    if value < Decimal::ZERO {
        return Err(InvalidPricingInput::new(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}

fn percentage(field: &'static str, value: Decimal) -> Result<(), InvalidPricingInput> {
    if value < Decimal::ZERO || value >= HUNDRED {
        return Err(InvalidPricingInput::new(
            field,
            format!("must be in [0, 100), got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input() -> PricingInput {
        PricingInput {
            cost_price: dec!(50),
            variable_costs: dec!(5),
            additional_fees: dec!(3),
            tax_percentage: dec!(15),
            desired_margin_percentage: dec!(30),
            fixed_costs_allocated: dec!(0),
            premium_factor: DEFAULT_PREMIUM_FACTOR,
            sales_channels: vec![],
        }
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2)); // rounds down to even
        assert_eq!(round_money(dec!(3.5), 0), dec!(4)); // rounds up to even
        assert_eq!(round_money(dec!(4.5), 0), dec!(4));
        assert_eq!(round_money(dec!(5.5), 0), dec!(6));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(68.23529411), 2), dec!(68.24));
    }

    // ==================== compute tests ====================

    #[test]
    fn test_compute_reference_example() {
        // cost=50, variable=5, fees=3, tax=15%, margin=30%
        let result = base_input().compute().unwrap();

        assert_eq!(result.variable_cost_total, dec!(58));
        assert_eq!(round_money(result.minimum_price, 2), dec!(68.24)); // 58 / 0.85
        assert_eq!(round_money(result.ideal_price, 2), dec!(105.45)); // 58 / 0.55
        assert_eq!(round_money(result.premium_price, 2), dec!(137.09)); // ideal * 1.3
        assert!(result.break_even_units.is_none());
        assert!(result.per_channel.is_empty());
    }

    #[test]
    fn test_compute_break_even_reference_example() {
        let mut input = base_input();
        input.fixed_costs_allocated = dec!(1000);

        let result = input.compute().unwrap();
        let break_even = result.break_even_units.unwrap();

        // profit_ideal = 105.4545... * 0.85 - 58 = 31.6363...
        assert_eq!(round_money(result.profit_per_unit_ideal, 2), dec!(31.64));
        assert_eq!(round_money(break_even, 2), dec!(31.61)); // 1000 / 31.6363...
    }

    #[test]
    fn test_compute_minimum_price_has_zero_profit() {
        let result = base_input().compute().unwrap();
        assert_eq!(round_money(result.profit_per_unit_minimum, 10), dec!(0));
    }

    #[test]
    fn test_compute_price_ordering() {
        // minimum <= ideal <= premium whenever premium_factor >= 1
        for (tax, margin, factor) in [
            (dec!(0), dec!(0), dec!(1)),
            (dec!(15), dec!(30), dec!(1.3)),
            (dec!(40), dec!(55), dec!(2)),
            (dec!(99), dec!(0), dec!(1.5)),
        ] {
            let mut input = base_input();
            input.tax_percentage = tax;
            input.desired_margin_percentage = margin;
            input.premium_factor = factor;

            let result = input.compute().unwrap();
            assert!(result.minimum_price <= result.ideal_price);
            assert!(result.ideal_price <= result.premium_price);
        }
    }

    #[test]
    fn test_compute_profit_matches_margin_share_of_price() {
        // profit_per_unit_ideal == margin/100 * ideal_price
        let result = base_input().compute().unwrap();
        let expected = dec!(0.30) * result.ideal_price;
        assert_eq!(
            round_money(result.profit_per_unit_ideal, 10),
            round_money(expected, 10)
        );
    }

    #[test]
    fn test_compute_channel_adjustment() {
        let mut input = base_input();
        input.sales_channels = vec![
            SalesChannel {
                channel: "Storefront".to_string(),
                fee_percentage: dec!(0),
            },
            SalesChannel {
                channel: "Marketplace".to_string(),
                fee_percentage: dec!(15),
            },
        ];

        let result = input.compute().unwrap();
        assert_eq!(result.per_channel.len(), 2);

        // Zero-fee channel keeps the base prices.
        let storefront = &result.per_channel[0];
        assert_eq!(storefront.channel, "Storefront");
        assert_eq!(storefront.minimum_price, result.minimum_price);
        assert_eq!(storefront.ideal_price, result.ideal_price);
        assert_eq!(storefront.premium_price, result.premium_price);

        // Adjusted price net of the channel fee reproduces the base price.
        let marketplace = &result.per_channel[1];
        let net = marketplace.ideal_price * (Decimal::ONE - dec!(0.15));
        assert_eq!(round_money(net, 8), round_money(result.ideal_price, 8));
        assert!(marketplace.ideal_price > result.ideal_price);
    }

    #[test]
    fn test_compute_channel_order_preserved() {
        let mut input = base_input();
        input.sales_channels = (0..5)
            .map(|i| SalesChannel {
                channel: format!("channel-{}", i),
                fee_percentage: Decimal::from(i),
            })
            .collect();

        let result = input.compute().unwrap();
        let names: Vec<&str> = result
            .per_channel
            .iter()
            .map(|c| c.channel.as_str())
            .collect();
        assert_eq!(
            names,
            ["channel-0", "channel-1", "channel-2", "channel-3", "channel-4"]
        );
    }

    #[test]
    fn test_compute_zero_tax_zero_margin() {
        let mut input = base_input();
        input.tax_percentage = dec!(0);
        input.desired_margin_percentage = dec!(0);

        let result = input.compute().unwrap();
        assert_eq!(result.minimum_price, dec!(58));
        assert_eq!(result.ideal_price, dec!(58));
        assert_eq!(result.profit_per_unit_ideal, dec!(0));
    }

    // ==================== validation tests ====================

    #[test]
    fn test_validate_rejects_tax_plus_margin_at_or_above_hundred() {
        let mut input = base_input();
        input.tax_percentage = dec!(85);
        input.desired_margin_percentage = dec!(20);

        let err = input.compute().unwrap_err();
        assert_eq!(err.field, "desired_margin_percentage");

        // Exactly 100 is rejected too.
        input.tax_percentage = dec!(70);
        input.desired_margin_percentage = dec!(30);
        assert!(input.compute().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_costs() {
        for field in [
            "cost_price",
            "variable_costs",
            "additional_fees",
            "fixed_costs_allocated",
        ] {
            let mut input = base_input();
            match field {
                "cost_price" => input.cost_price = dec!(-1),
                "variable_costs" => input.variable_costs = dec!(-0.01),
                "additional_fees" => input.additional_fees = dec!(-5),
                _ => input.fixed_costs_allocated = dec!(-100),
            }
            let err = input.compute().unwrap_err();
            assert_eq!(err.field, field);
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_percentages() {
        let mut input = base_input();
        input.tax_percentage = dec!(100);
        assert_eq!(input.compute().unwrap_err().field, "tax_percentage");

        let mut input = base_input();
        input.desired_margin_percentage = dec!(-1);
        assert_eq!(
            input.compute().unwrap_err().field,
            "desired_margin_percentage"
        );
    }

    #[test]
    fn test_validate_rejects_channel_fee_at_or_above_hundred() {
        let mut input = base_input();
        input.sales_channels = vec![SalesChannel {
            channel: "Consignment".to_string(),
            fee_percentage: dec!(100),
        }];

        let err = input.compute().unwrap_err();
        assert_eq!(err.field, "sales_channels");
        assert!(err.reason.contains("Consignment"));
    }

    #[test]
    fn test_validate_rejects_non_positive_premium_factor() {
        let mut input = base_input();
        input.premium_factor = dec!(0);
        assert_eq!(input.compute().unwrap_err().field, "premium_factor");
    }

    #[test]
    fn test_compute_break_even_undefined_with_zero_margin() {
        // Zero margin means zero per-unit profit; fixed costs can never be
        // recovered, so the calculation is rejected.
        let mut input = base_input();
        input.desired_margin_percentage = dec!(0);
        input.fixed_costs_allocated = dec!(500);

        let err = input.compute().unwrap_err();
        assert_eq!(err.field, "desired_margin_percentage");

        // Without fixed costs the same margin is fine, just no break-even.
        input.fixed_costs_allocated = dec!(0);
        let result = input.compute().unwrap();
        assert!(result.break_even_units.is_none());
    }

    #[test]
    fn test_compute_does_not_mutate_input() {
        let input = base_input();
        let snapshot = input.clone();
        let _ = input.compute().unwrap();
        assert_eq!(input, snapshot);
    }
}
