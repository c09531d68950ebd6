use super::domain::AnalysisGap;
use super::listing::ListingSnapshot;
use super::recommendation::{Recommendation, RecommendationLabel};
use super::{DealAnalysis, ListingOutcome, ListingScore};
use serde::Serialize;

/// Currency is reported to the cent.
pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentages are reported to two decimals.
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancingView {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_cash_invested: f64,
    pub total_interest: f64,
    pub number_of_payments: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalView {
    pub monthly_rent: f64,
    pub monthly_expenses: f64,
    pub monthly_cash_flow: f64,
    pub annual_cash_flow: f64,
    pub cap_rate: f64,
    pub cash_on_cash_return: Option<f64>,
    pub rent_to_price_ratio: f64,
    pub one_percent_threshold: f64,
    pub meets_1_percent_rule: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlipView {
    pub arv: f64,
    pub max_purchase_70_rule: f64,
    pub meets_70_rule: bool,
    pub total_investment: f64,
    pub potential_profit: f64,
    pub net_profit: f64,
    pub flip_roi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationView {
    pub label: RecommendationLabel,
    pub display_label: &'static str,
    pub summary: String,
}

impl From<&Recommendation> for RecommendationView {
    fn from(recommendation: &Recommendation) -> Self {
        Self {
            label: recommendation.label,
            display_label: recommendation.label.label(),
            summary: recommendation.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapView {
    pub code: AnalysisGap,
    pub detail: &'static str,
}

/// Presentation payload for a deal, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealReport {
    pub financing: FinancingView,
    pub rental_analysis: Option<RentalView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flip_analysis: Option<FlipView>,
    pub recommendation: RecommendationView,
    pub not_applicable: Vec<GapView>,
}

impl From<&DealAnalysis> for DealReport {
    fn from(analysis: &DealAnalysis) -> Self {
        let amortization = &analysis.amortization;
        let financing = FinancingView {
            down_payment: round_currency(amortization.down_payment_amount),
            loan_amount: round_currency(amortization.loan_amount),
            monthly_payment: round_currency(amortization.monthly_payment),
            total_cash_invested: round_currency(amortization.total_cash_invested),
            total_interest: round_currency(amortization.total_interest),
            number_of_payments: amortization.number_of_payments,
        };

        let rental_analysis = analysis.rental.as_ref().map(|rental| RentalView {
            monthly_rent: round_currency(rental.monthly_rent),
            monthly_expenses: round_currency(rental.monthly_expenses),
            monthly_cash_flow: round_currency(rental.monthly_cash_flow),
            annual_cash_flow: round_currency(rental.annual_cash_flow),
            cap_rate: round_percent(rental.cap_rate_percent),
            cash_on_cash_return: rental.cash_on_cash_return_percent.map(round_percent),
            rent_to_price_ratio: round_percent(rental.rent_to_price_ratio_percent),
            one_percent_threshold: round_currency(rental.one_percent_threshold),
            meets_1_percent_rule: rental.meets_one_percent_rule,
        });

        let flip_analysis = analysis.flip.as_ref().map(|flip| FlipView {
            arv: round_currency(flip.after_repair_value),
            max_purchase_70_rule: round_currency(flip.max_purchase_price_70_rule),
            meets_70_rule: flip.meets_70_rule,
            total_investment: round_currency(flip.total_investment),
            potential_profit: round_currency(flip.potential_profit),
            net_profit: round_currency(flip.net_profit),
            flip_roi: flip.estimated_roi_percent.map(round_percent),
        });

        let not_applicable = analysis
            .gaps
            .iter()
            .map(|gap| GapView {
                code: *gap,
                detail: gap.detail(),
            })
            .collect();

        Self {
            financing,
            rental_analysis,
            flip_analysis,
            recommendation: RecommendationView::from(&analysis.recommendation),
            not_applicable,
        }
    }
}

/// Catalog listing joined with its report, or the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingReport {
    pub listing_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<DealReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListingReport {
    pub fn from_score(score: &ListingScore, listing: Option<&ListingSnapshot>) -> Self {
        let (report, error) = match &score.outcome {
            ListingOutcome::Scored(analysis) => (Some(DealReport::from(analysis)), None),
            ListingOutcome::Rejected { error } => (None, Some(error.clone())),
        };

        Self {
            listing_id: score.listing_id.clone(),
            address: listing.map(|listing| listing.address.clone()),
            report,
            error,
        }
    }
}
