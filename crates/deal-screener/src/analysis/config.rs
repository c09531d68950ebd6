use super::domain::{DealError, FinancingTerms};
use super::expenses::OperatingExpenseAssumptions;
use super::flip::FlipCostAllowance;
use super::market::MarketThresholds;
use super::recommendation::RecommendationPolicy;
use serde::{Deserialize, Serialize};

/// Tunable inputs for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub market: MarketThresholds,
    pub recommendation: RecommendationPolicy,
    pub flip_costs: FlipCostAllowance,
    pub expenses: OperatingExpenseAssumptions,
    /// Financing assumed when scoring catalog listings.
    pub default_financing: FinancingTerms,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            market: MarketThresholds::default(),
            recommendation: RecommendationPolicy::default(),
            flip_costs: FlipCostAllowance::default(),
            expenses: OperatingExpenseAssumptions::default(),
            default_financing: FinancingTerms::new(20.0, 7.0, 30),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), DealError> {
        self.market.validate()?;
        self.flip_costs.validate()?;
        self.expenses.validate()?;
        self.default_financing.validate()?;
        Ok(())
    }
}
