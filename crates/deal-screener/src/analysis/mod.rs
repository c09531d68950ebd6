//! Investment analysis and deal calculation engine.
//!
//! Every calculator here is a pure function of its inputs. `DealAnalyzer` wires
//! them into the screening pipeline: amortization feeds the rental analysis, the
//! flip analysis runs on its own, and the recommendation classifier merges both
//! with optional market context.

pub mod amortization;
pub mod catalog;
mod config;
pub mod domain;
pub mod expenses;
pub mod flip;
pub mod import;
pub mod listing;
pub mod market;
pub mod recommendation;
pub mod rental;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use amortization::{amortize, AmortizationPeriod, AmortizationResult};
pub use catalog::{CatalogError, ListingCatalog, MarketTrendSource};
pub use config::AnalysisConfig;
pub use domain::{
    AnalysisGap, DealError, FinancingTerms, InvestmentStrategy, PropertyFinancials,
    StrategyFilter, MAX_LOAN_TERM_YEARS,
};
pub use expenses::{ExpenseBreakdown, OperatingExpenseAssumptions};
pub use flip::{analyze_flip, FlipCostAllowance, FlipVerdict};
pub use import::{ListingImportError, ListingImporter};
pub use listing::{ListingQuery, ListingSnapshot};
pub use market::{
    DemandLevel, MarketSignal, MarketThresholds, MarketTrendInputs, MarketType, MarketVerdict,
    PriceTrend,
};
pub use recommendation::{Combination, Recommendation, RecommendationLabel, RecommendationPolicy};
pub use rental::{analyze_rental, RentalVerdict};
pub use router::deal_router;
pub use service::{DealScreeningService, DealServiceError, MarketOverview};
pub use views::{DealReport, ListingReport};

use serde::Serialize;
use tracing::{debug, warn};

/// Stateless pipeline that applies the analysis configuration to a deal.
#[derive(Debug, Clone, Default)]
pub struct DealAnalyzer {
    config: AnalysisConfig,
}

impl DealAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn compute_deal(
        &self,
        property: &PropertyFinancials,
        financing: &FinancingTerms,
        filter: StrategyFilter,
    ) -> Result<DealAnalysis, DealError> {
        self.compute_deal_in_market(property, financing, filter, None)
    }

    /// Runs the full pipeline. `InvalidInput` aborts the whole calculation;
    /// missing optional data and undefined ratios degrade to recorded gaps.
    pub fn compute_deal_in_market(
        &self,
        property: &PropertyFinancials,
        financing: &FinancingTerms,
        filter: StrategyFilter,
        market: Option<&MarketVerdict>,
    ) -> Result<DealAnalysis, DealError> {
        property.validate()?;

        let amortization = amortize(property.purchase_price, property.repair_cost, financing)?;
        let mut gaps = Vec::new();

        let rental = match property.monthly_rent {
            Some(rent) => {
                let expenses = property.monthly_expenses.unwrap_or(0.0);
                let verdict =
                    analyze_rental(&amortization, rent, expenses, property.purchase_price)?;
                if !verdict.cash_on_cash_defined() {
                    gaps.push(AnalysisGap::CashOnCashUndefined);
                }
                Some(verdict)
            }
            None => {
                gaps.push(AnalysisGap::MissingRentData);
                None
            }
        };

        let flip = analyze_flip(
            property.purchase_price,
            property.repair_cost,
            property.after_repair_value,
            &self.config.flip_costs,
        )?;
        match &flip {
            Some(verdict) if verdict.estimated_roi_percent.is_none() => {
                gaps.push(AnalysisGap::FlipRoiUndefined)
            }
            Some(_) => {}
            None => gaps.push(AnalysisGap::MissingAfterRepairValue),
        }

        let recommendation = recommendation::classify(
            flip.as_ref(),
            rental.as_ref(),
            filter,
            &self.config.recommendation,
            market,
        );

        debug!(
            purchase_price = property.purchase_price,
            monthly_payment = amortization.monthly_payment,
            label = recommendation.label.label(),
            "deal analyzed"
        );

        Ok(DealAnalysis {
            amortization,
            rental,
            flip,
            recommendation,
            gaps,
        })
    }

    pub fn classify_market(&self, signal: &MarketSignal) -> Result<MarketVerdict, DealError> {
        market::classify_market(signal, &self.config.market)
    }

    /// Scores a catalog listing with the configured default financing.
    pub fn score_listing(
        &self,
        listing: &ListingSnapshot,
        filter: StrategyFilter,
        market: Option<&MarketVerdict>,
    ) -> Result<DealAnalysis, DealError> {
        let (financials, _) = listing.to_financials(&self.config.expenses)?;
        self.compute_deal_in_market(
            &financials,
            &self.config.default_financing,
            filter,
            market,
        )
    }

    /// Scores every listing independently; a rejected listing never stops the
    /// rest of the batch.
    pub fn score_batch(
        &self,
        listings: &[ListingSnapshot],
        filter: StrategyFilter,
    ) -> Vec<ListingScore> {
        listings
            .iter()
            .map(|listing| {
                let outcome = match self.score_listing(listing, filter, None) {
                    Ok(analysis) => ListingOutcome::Scored(analysis),
                    Err(err) => {
                        warn!(listing_id = %listing.id, error = %err, "listing rejected");
                        ListingOutcome::Rejected {
                            error: err.to_string(),
                        }
                    }
                };
                ListingScore {
                    listing_id: listing.id.clone(),
                    outcome,
                }
            })
            .collect()
    }
}

/// Everything the pipeline derives for one deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealAnalysis {
    pub amortization: AmortizationResult,
    pub rental: Option<RentalVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip: Option<FlipVerdict>,
    pub recommendation: Recommendation,
    pub gaps: Vec<AnalysisGap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingScore {
    pub listing_id: String,
    pub outcome: ListingOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ListingOutcome {
    Scored(DealAnalysis),
    Rejected { error: String },
}

/// Analyzes a deal with the default configuration, weighing both strategies.
pub fn compute_deal(
    property: &PropertyFinancials,
    financing: &FinancingTerms,
) -> Result<DealAnalysis, DealError> {
    DealAnalyzer::default().compute_deal(property, financing, StrategyFilter::Both)
}

/// Classifies a market with the default thresholds.
pub fn classify_market(signal: &MarketSignal) -> Result<MarketVerdict, DealError> {
    DealAnalyzer::default().classify_market(signal)
}
