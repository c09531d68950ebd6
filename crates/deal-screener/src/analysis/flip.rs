use super::domain::{require_non_negative, require_positive, DealError};
use serde::{Deserialize, Serialize};

/// Share of after-repair value a flipper should pay, less repairs.
const MAX_PURCHASE_PERCENT_OF_ARV: f64 = 70.0;

/// Transaction costs deducted from flip profit, as percents of purchase price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlipCostAllowance {
    pub closing_cost_percent: f64,
    pub carrying_cost_percent: f64,
}

impl FlipCostAllowance {
    pub fn validate(&self) -> Result<(), DealError> {
        require_non_negative("closing_cost_percent", self.closing_cost_percent)?;
        require_non_negative("carrying_cost_percent", self.carrying_cost_percent)?;
        Ok(())
    }

    pub fn costs_for(&self, purchase_price: f64) -> f64 {
        purchase_price * (self.closing_cost_percent + self.carrying_cost_percent) / 100.0
    }
}

/// Fix-and-flip metrics under the 70% rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipVerdict {
    pub after_repair_value: f64,
    pub max_purchase_price_70_rule: f64,
    pub meets_70_rule: bool,
    pub total_investment: f64,
    pub potential_profit: f64,
    pub transaction_costs: f64,
    pub net_profit: f64,
    /// `None` when purchase price plus repairs is zero.
    pub estimated_roi_percent: Option<f64>,
    pub profit_margin_percent: Option<f64>,
}

/// Returns `Ok(None)` when no after-repair value is known; a zero ARV must be
/// supplied explicitly to be analyzed.
pub fn analyze_flip(
    purchase_price: f64,
    repair_cost: f64,
    after_repair_value: Option<f64>,
    allowance: &FlipCostAllowance,
) -> Result<Option<FlipVerdict>, DealError> {
    require_positive("purchase_price", purchase_price)?;
    require_non_negative("repair_cost", repair_cost)?;
    allowance.validate()?;

    let Some(after_repair_value) = after_repair_value else {
        return Ok(None);
    };
    require_non_negative("after_repair_value", after_repair_value)?;

    let max_purchase_price_70_rule =
        after_repair_value * MAX_PURCHASE_PERCENT_OF_ARV / 100.0 - repair_cost;
    let total_investment = purchase_price + repair_cost;
    let potential_profit = after_repair_value - total_investment;
    let transaction_costs = allowance.costs_for(purchase_price);
    let net_profit = potential_profit - transaction_costs;

    let (estimated_roi_percent, profit_margin_percent) = if total_investment == 0.0 {
        (None, None)
    } else {
        (
            Some(net_profit / total_investment * 100.0),
            Some(potential_profit / total_investment * 100.0),
        )
    };

    Ok(Some(FlipVerdict {
        after_repair_value,
        max_purchase_price_70_rule,
        meets_70_rule: purchase_price <= max_purchase_price_70_rule,
        total_investment,
        potential_profit,
        transaction_costs,
        net_profit,
        estimated_roi_percent,
        profit_margin_percent,
    }))
}
