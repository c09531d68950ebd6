use super::domain::{require_non_negative, require_positive, DealError};
use serde::{Deserialize, Serialize};

/// Operating-cost allowances used when a listing carries no expense figure.
///
/// Insurance is a percent of purchase price per year; the rest are percents of
/// monthly rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingExpenseAssumptions {
    pub insurance_percent_of_price: f64,
    pub maintenance_percent_of_rent: f64,
    pub vacancy_percent_of_rent: f64,
    pub management_percent_of_rent: f64,
}

impl Default for OperatingExpenseAssumptions {
    fn default() -> Self {
        Self {
            insurance_percent_of_price: 0.5,
            maintenance_percent_of_rent: 10.0,
            vacancy_percent_of_rent: 5.0,
            management_percent_of_rent: 8.0,
        }
    }
}

impl OperatingExpenseAssumptions {
    pub fn validate(&self) -> Result<(), DealError> {
        require_non_negative("insurance_percent_of_price", self.insurance_percent_of_price)?;
        require_non_negative("maintenance_percent_of_rent", self.maintenance_percent_of_rent)?;
        require_non_negative("vacancy_percent_of_rent", self.vacancy_percent_of_rent)?;
        require_non_negative("management_percent_of_rent", self.management_percent_of_rent)?;
        Ok(())
    }
}

/// Itemized monthly operating expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub property_taxes: f64,
    pub hoa_fees: f64,
    pub insurance: f64,
    pub maintenance: f64,
    pub vacancy: f64,
    pub management: f64,
}

impl ExpenseBreakdown {
    pub fn total(&self) -> f64 {
        self.property_taxes
            + self.hoa_fees
            + self.insurance
            + self.maintenance
            + self.vacancy
            + self.management
    }
}

pub fn estimate_monthly_expenses(
    purchase_price: f64,
    monthly_rent: f64,
    annual_property_taxes: f64,
    monthly_hoa_fees: f64,
    assumptions: &OperatingExpenseAssumptions,
) -> Result<ExpenseBreakdown, DealError> {
    require_positive("purchase_price", purchase_price)?;
    require_non_negative("monthly_rent", monthly_rent)?;
    require_non_negative("property_taxes", annual_property_taxes)?;
    require_non_negative("hoa_fees", monthly_hoa_fees)?;
    assumptions.validate()?;

    Ok(ExpenseBreakdown {
        property_taxes: annual_property_taxes / 12.0,
        hoa_fees: monthly_hoa_fees,
        insurance: purchase_price * assumptions.insurance_percent_of_price / 100.0 / 12.0,
        maintenance: monthly_rent * assumptions.maintenance_percent_of_rent / 100.0,
        vacancy: monthly_rent * assumptions.vacancy_percent_of_rent / 100.0,
        management: monthly_rent * assumptions.management_percent_of_rent / 100.0,
    })
}
