use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw property figures feeding a single deal calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyFinancials {
    pub purchase_price: f64,
    #[serde(default)]
    pub monthly_rent: Option<f64>,
    #[serde(default)]
    pub monthly_expenses: Option<f64>,
    #[serde(default)]
    pub repair_cost: f64,
    #[serde(default)]
    pub after_repair_value: Option<f64>,
}

impl PropertyFinancials {
    pub fn new(purchase_price: f64) -> Self {
        Self {
            purchase_price,
            monthly_rent: None,
            monthly_expenses: None,
            repair_cost: 0.0,
            after_repair_value: None,
        }
    }

    pub fn with_rent(mut self, monthly_rent: f64, monthly_expenses: f64) -> Self {
        self.monthly_rent = Some(monthly_rent);
        self.monthly_expenses = Some(monthly_expenses);
        self
    }

    pub fn with_rehab(mut self, repair_cost: f64, after_repair_value: Option<f64>) -> Self {
        self.repair_cost = repair_cost;
        self.after_repair_value = after_repair_value;
        self
    }

    pub fn validate(&self) -> Result<(), DealError> {
        require_positive("purchase_price", self.purchase_price)?;
        require_non_negative("repair_cost", self.repair_cost)?;
        if let Some(rent) = self.monthly_rent {
            require_non_negative("monthly_rent", rent)?;
        }
        if let Some(expenses) = self.monthly_expenses {
            require_non_negative("monthly_expenses", expenses)?;
        }
        if let Some(arv) = self.after_repair_value {
            require_non_negative("after_repair_value", arv)?;
        }
        Ok(())
    }
}

/// Longest loan term accepted, in years.
pub const MAX_LOAN_TERM_YEARS: u32 = 50;

/// Loan parameters, expressed in percent units (7.0 means 7%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub down_payment_percent: f64,
    pub annual_interest_rate_percent: f64,
    pub loan_term_years: u32,
}

impl FinancingTerms {
    pub fn new(down_payment_percent: f64, annual_interest_rate_percent: f64, loan_term_years: u32) -> Self {
        Self {
            down_payment_percent,
            annual_interest_rate_percent,
            loan_term_years,
        }
    }

    pub fn validate(&self) -> Result<(), DealError> {
        require_finite("down_payment_percent", self.down_payment_percent)?;
        if !(0.0..=100.0).contains(&self.down_payment_percent) {
            return Err(DealError::invalid(
                "down_payment_percent",
                format!("{} is outside 0-100", self.down_payment_percent),
            ));
        }
        require_non_negative(
            "annual_interest_rate_percent",
            self.annual_interest_rate_percent,
        )?;
        if self.loan_term_years == 0 {
            return Err(DealError::invalid(
                "loan_term_years",
                "must be a positive number of years",
            ));
        }
        if self.loan_term_years > MAX_LOAN_TERM_YEARS {
            return Err(DealError::invalid(
                "loan_term_years",
                format!(
                    "{} exceeds the {MAX_LOAN_TERM_YEARS} year maximum",
                    self.loan_term_years
                ),
            ));
        }
        Ok(())
    }
}

/// Investment strategy a verdict speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStrategy {
    Flip,
    Rental,
}

impl InvestmentStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            InvestmentStrategy::Flip => "Flip",
            InvestmentStrategy::Rental => "Rental",
        }
    }
}

/// Restricts which strategy verdicts feed the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum StrategyFilter {
    Flip,
    Rental,
    #[default]
    Both,
}

impl StrategyFilter {
    pub fn strategies(&self) -> &'static [InvestmentStrategy] {
        match self {
            StrategyFilter::Flip => &[InvestmentStrategy::Flip],
            StrategyFilter::Rental => &[InvestmentStrategy::Rental],
            StrategyFilter::Both => &[InvestmentStrategy::Flip, InvestmentStrategy::Rental],
        }
    }
}

impl FromStr for StrategyFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flip" => Ok(Self::Flip),
            "rental" => Ok(Self::Rental),
            "both" | "" => Ok(Self::Both),
            other => Err(format!(
                "unknown investment strategy '{other}' (expected flip, rental, or both)"
            )),
        }
    }
}

impl TryFrom<String> for StrategyFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Marker for a sub-analysis or ratio that could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisGap {
    MissingAfterRepairValue,
    MissingRentData,
    CashOnCashUndefined,
    FlipRoiUndefined,
}

impl AnalysisGap {
    pub fn detail(&self) -> &'static str {
        match self {
            AnalysisGap::MissingAfterRepairValue => {
                "after-repair value not supplied; flip analysis skipped"
            }
            AnalysisGap::MissingRentData => "monthly rent not supplied; rental analysis skipped",
            AnalysisGap::CashOnCashUndefined => {
                "no cash invested; cash-on-cash return not applicable"
            }
            AnalysisGap::FlipRoiUndefined => {
                "purchase price plus repairs is zero; flip ROI not applicable"
            }
        }
    }
}

/// Failure raised when an input cannot be analyzed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DealError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl DealError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            DealError::InvalidInput { field, .. } => field,
        }
    }
}

pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, DealError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DealError::invalid(field, "must be a finite number"))
    }
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, DealError> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(DealError::invalid(
            field,
            format!("{value} must be greater than zero"),
        ))
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, DealError> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(DealError::invalid(field, format!("{value} must not be negative")))
    }
}

impl fmt::Display for StrategyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrategyFilter::Flip => "flip",
            StrategyFilter::Rental => "rental",
            StrategyFilter::Both => "both",
        };
        f.write_str(label)
    }
}
