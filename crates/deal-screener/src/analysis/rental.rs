use super::amortization::AmortizationResult;
use super::domain::{require_non_negative, require_positive, DealError};
use serde::{Deserialize, Serialize};

/// Buy-and-hold metrics for a financed rental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalVerdict {
    pub monthly_rent: f64,
    pub monthly_expenses: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub net_operating_income_monthly: f64,
    pub net_operating_income_annual: f64,
    pub cap_rate_percent: f64,
    /// `None` when no cash was invested.
    pub cash_on_cash_return_percent: Option<f64>,
    pub rent_to_price_ratio_percent: f64,
    pub one_percent_threshold: f64,
    pub meets_one_percent_rule: bool,
}

impl RentalVerdict {
    pub fn cash_on_cash_defined(&self) -> bool {
        self.cash_on_cash_return_percent.is_some()
    }
}

pub fn analyze_rental(
    amortization: &AmortizationResult,
    monthly_rent: f64,
    monthly_expenses: f64,
    purchase_price: f64,
) -> Result<RentalVerdict, DealError> {
    require_positive("purchase_price", purchase_price)?;
    require_non_negative("monthly_rent", monthly_rent)?;
    require_non_negative("monthly_expenses", monthly_expenses)?;

    let net_operating_income_monthly = monthly_rent - monthly_expenses;
    let net_operating_income_annual = net_operating_income_monthly * 12.0;
    let monthly_cash_flow = net_operating_income_monthly - amortization.monthly_payment;
    let annual_cash_flow = monthly_cash_flow * 12.0;

    let cash_on_cash_return_percent = if amortization.total_cash_invested == 0.0 {
        None
    } else {
        Some(annual_cash_flow / amortization.total_cash_invested * 100.0)
    };

    let one_percent_threshold = purchase_price / 100.0;

    Ok(RentalVerdict {
        monthly_rent,
        monthly_expenses,
        monthly_cash_flow,
        annual_cash_flow,
        net_operating_income_monthly,
        net_operating_income_annual,
        cap_rate_percent: net_operating_income_annual / purchase_price * 100.0,
        cash_on_cash_return_percent,
        rent_to_price_ratio_percent: monthly_rent / purchase_price * 100.0,
        one_percent_threshold,
        meets_one_percent_rule: monthly_rent >= one_percent_threshold,
    })
}
