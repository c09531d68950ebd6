use super::domain::{InvestmentStrategy, StrategyFilter};
use super::flip::FlipVerdict;
use super::market::{MarketType, MarketVerdict};
use super::rental::RentalVerdict;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How individual strategy verdicts combine into one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combination {
    /// A property is worth pursuing when any requested strategy qualifies.
    #[default]
    RequireEither,
    /// Every requested strategy must be computable and qualify.
    RequireBoth,
}

impl FromStr for Combination {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "either" | "require_either" | "any" => Ok(Self::RequireEither),
            "both" | "require_both" | "all" => Ok(Self::RequireBoth),
            other => Err(format!("unknown combination '{other}' (expected either or both)")),
        }
    }
}

/// Screening policy applied by the classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    pub combination: Combination,
    /// Extra ROI bar a flip must clear on top of the 70% rule.
    #[serde(default)]
    pub min_flip_roi_percent: Option<f64>,
    /// Extra cash-on-cash bar a rental must clear on top of the 1% rule.
    #[serde(default)]
    pub min_cash_on_cash_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLabel {
    GoodDeal,
    ReviewRequired,
    Informational,
}

impl RecommendationLabel {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationLabel::GoodDeal => "Good Deal",
            RecommendationLabel::ReviewRequired => "Review Required",
            RecommendationLabel::Informational => "Informational",
        }
    }
}

/// Final screening verdict along with the strategies that drove it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub label: RecommendationLabel,
    pub policy: Combination,
    pub qualifying_strategies: Vec<InvestmentStrategy>,
    pub failing_strategies: Vec<InvestmentStrategy>,
    pub missing_strategies: Vec<InvestmentStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_type: Option<MarketType>,
}

impl Recommendation {
    pub fn is_good_deal(&self) -> bool {
        self.label == RecommendationLabel::GoodDeal
    }

    pub fn qualifies_for(&self, strategy: InvestmentStrategy) -> bool {
        self.qualifying_strategies.contains(&strategy)
    }

    pub fn summary(&self) -> String {
        let headline = match self.label {
            RecommendationLabel::GoodDeal => {
                let flip = self.qualifies_for(InvestmentStrategy::Flip);
                let rental = self.qualifies_for(InvestmentStrategy::Rental);
                match (flip, rental) {
                    (true, true) => "Excellent opportunity for both flipping and rental".to_string(),
                    (true, false) => "Strong flip opportunity".to_string(),
                    _ => "Good rental property".to_string(),
                }
            }
            RecommendationLabel::ReviewRequired => {
                let mut reasons = Vec::new();
                if !self.failing_strategies.is_empty() {
                    reasons.push(format!("fails {}", strategy_list(&self.failing_strategies)));
                }
                if !self.missing_strategies.is_empty() {
                    reasons.push(format!(
                        "no data for {}",
                        strategy_list(&self.missing_strategies)
                    ));
                }
                if reasons.is_empty() {
                    "Requires careful analysis".to_string()
                } else {
                    format!("Requires careful analysis: {}", reasons.join("; "))
                }
            }
            RecommendationLabel::Informational => {
                "Insufficient data for a flip or rental verdict".to_string()
            }
        };

        match self.market_type {
            Some(market) => format!("{headline} ({})", market.label()),
            None => headline,
        }
    }
}

fn strategy_list(strategies: &[InvestmentStrategy]) -> String {
    strategies
        .iter()
        .map(|strategy| strategy.label().to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(" and ")
}

enum Assessment {
    Qualifies,
    Fails,
    Missing,
}

fn assess_flip(flip: Option<&FlipVerdict>, policy: &RecommendationPolicy) -> Assessment {
    let Some(flip) = flip else {
        return Assessment::Missing;
    };

    let roi_ok = match policy.min_flip_roi_percent {
        Some(minimum) => flip.estimated_roi_percent.is_some_and(|roi| roi > minimum),
        None => true,
    };

    if flip.meets_70_rule && roi_ok {
        Assessment::Qualifies
    } else {
        Assessment::Fails
    }
}

fn assess_rental(rental: Option<&RentalVerdict>, policy: &RecommendationPolicy) -> Assessment {
    let Some(rental) = rental else {
        return Assessment::Missing;
    };

    let return_ok = match policy.min_cash_on_cash_percent {
        Some(minimum) => rental
            .cash_on_cash_return_percent
            .is_some_and(|coc| coc > minimum),
        None => true,
    };

    if rental.meets_one_percent_rule && return_ok {
        Assessment::Qualifies
    } else {
        Assessment::Fails
    }
}

/// Merges strategy verdicts into one label.
///
/// Strategies outside `filter` are ignored. A requested strategy without data is
/// reported as missing rather than failed. Market context is attached to the
/// result but never changes the label.
pub fn classify(
    flip: Option<&FlipVerdict>,
    rental: Option<&RentalVerdict>,
    filter: StrategyFilter,
    policy: &RecommendationPolicy,
    market: Option<&MarketVerdict>,
) -> Recommendation {
    let mut qualifying_strategies = Vec::new();
    let mut failing_strategies = Vec::new();
    let mut missing_strategies = Vec::new();

    for strategy in filter.strategies() {
        let assessment = match strategy {
            InvestmentStrategy::Flip => assess_flip(flip, policy),
            InvestmentStrategy::Rental => assess_rental(rental, policy),
        };
        match assessment {
            Assessment::Qualifies => qualifying_strategies.push(*strategy),
            Assessment::Fails => failing_strategies.push(*strategy),
            Assessment::Missing => missing_strategies.push(*strategy),
        }
    }

    let label = if qualifying_strategies.is_empty() && failing_strategies.is_empty() {
        RecommendationLabel::Informational
    } else {
        match policy.combination {
            Combination::RequireEither if !qualifying_strategies.is_empty() => {
                RecommendationLabel::GoodDeal
            }
            Combination::RequireBoth
                if failing_strategies.is_empty() && missing_strategies.is_empty() =>
            {
                RecommendationLabel::GoodDeal
            }
            _ => RecommendationLabel::ReviewRequired,
        }
    };

    Recommendation {
        label,
        policy: policy.combination,
        qualifying_strategies,
        failing_strategies,
        missing_strategies,
        market_type: market.map(|verdict| verdict.market_type),
    }
}
