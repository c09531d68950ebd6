use super::common::*;
use crate::analysis::recommendation::classify;
use crate::analysis::{
    amortize, analyze_flip, analyze_rental, classify_market, Combination, FlipCostAllowance,
    FlipVerdict, InvestmentStrategy, RecommendationLabel, RecommendationPolicy, RentalVerdict,
    StrategyFilter,
};

fn qualifying_flip() -> FlipVerdict {
    analyze_flip(150_000.0, 20_000.0, Some(300_000.0), &FlipCostAllowance::default())
        .expect("valid")
        .expect("arv supplied")
}

fn failing_flip() -> FlipVerdict {
    analyze_flip(200_000.0, 30_000.0, Some(320_000.0), &FlipCostAllowance::default())
        .expect("valid")
        .expect("arv supplied")
}

fn rental_at(rent: f64) -> RentalVerdict {
    let financing = amortize(250_000.0, 0.0, &conventional_financing()).expect("valid");
    analyze_rental(&financing, rent, 400.0, 250_000.0).expect("valid")
}

#[test]
fn either_strategy_qualifying_is_a_good_deal() {
    let policy = RecommendationPolicy::default();
    let rental = rental_at(2_000.0);
    let flip = qualifying_flip();

    let recommendation = classify(
        Some(&flip),
        Some(&rental),
        StrategyFilter::Both,
        &policy,
        None,
    );

    assert_eq!(recommendation.label, RecommendationLabel::GoodDeal);
    assert_eq!(
        recommendation.qualifying_strategies,
        vec![InvestmentStrategy::Flip]
    );
    assert_eq!(
        recommendation.failing_strategies,
        vec![InvestmentStrategy::Rental]
    );
    assert_eq!(recommendation.summary(), "Strong flip opportunity");
}

#[test]
fn both_strategies_qualifying_reads_as_excellent() {
    let rental = rental_at(3_000.0);
    let flip = qualifying_flip();

    let recommendation = classify(
        Some(&flip),
        Some(&rental),
        StrategyFilter::Both,
        &RecommendationPolicy::default(),
        None,
    );

    assert!(recommendation.is_good_deal());
    assert_eq!(
        recommendation.summary(),
        "Excellent opportunity for both flipping and rental"
    );
}

#[test]
fn failing_and_missing_strategies_require_review() {
    let flip = failing_flip();

    let recommendation = classify(
        Some(&flip),
        None,
        StrategyFilter::Both,
        &RecommendationPolicy::default(),
        None,
    );

    assert_eq!(recommendation.label, RecommendationLabel::ReviewRequired);
    assert_eq!(
        recommendation.missing_strategies,
        vec![InvestmentStrategy::Rental]
    );
    assert_eq!(
        recommendation.summary(),
        "Requires careful analysis: fails flip; no data for rental"
    );
}

#[test]
fn missing_arv_falls_through_to_rental() {
    let rental = rental_at(3_000.0);

    let recommendation = classify(
        None,
        Some(&rental),
        StrategyFilter::Both,
        &RecommendationPolicy::default(),
        None,
    );

    assert_eq!(recommendation.label, RecommendationLabel::GoodDeal);
    assert!(recommendation.qualifies_for(InvestmentStrategy::Rental));
    assert_eq!(
        recommendation.missing_strategies,
        vec![InvestmentStrategy::Flip]
    );
    assert_eq!(recommendation.summary(), "Good rental property");
}

#[test]
fn require_both_demands_every_strategy() {
    let policy = RecommendationPolicy {
        combination: Combination::RequireBoth,
        ..RecommendationPolicy::default()
    };
    let rental = rental_at(3_000.0);
    let flip = qualifying_flip();

    let missing_flip = classify(None, Some(&rental), StrategyFilter::Both, &policy, None);
    assert_eq!(missing_flip.label, RecommendationLabel::ReviewRequired);
    assert_eq!(missing_flip.policy, Combination::RequireBoth);

    let one_failing = classify(
        Some(&flip),
        Some(&rental_at(2_000.0)),
        StrategyFilter::Both,
        &policy,
        None,
    );
    assert_eq!(one_failing.label, RecommendationLabel::ReviewRequired);

    let both = classify(Some(&flip), Some(&rental), StrategyFilter::Both, &policy, None);
    assert_eq!(both.label, RecommendationLabel::GoodDeal);
}

#[test]
fn filter_ignores_strategies_outside_scope() {
    let rental = rental_at(3_000.0);
    let flip = failing_flip();
    let policy = RecommendationPolicy::default();

    let rental_only = classify(Some(&flip), Some(&rental), StrategyFilter::Rental, &policy, None);
    assert_eq!(rental_only.label, RecommendationLabel::GoodDeal);
    assert!(rental_only.failing_strategies.is_empty());

    let flip_only = classify(None, Some(&rental), StrategyFilter::Flip, &policy, None);
    assert_eq!(flip_only.label, RecommendationLabel::Informational);
    assert_eq!(
        flip_only.summary(),
        "Insufficient data for a flip or rental verdict"
    );
}

#[test]
fn nothing_computable_is_informational() {
    let recommendation = classify(
        None,
        None,
        StrategyFilter::Both,
        &RecommendationPolicy::default(),
        None,
    );

    assert_eq!(recommendation.label, RecommendationLabel::Informational);
    assert_eq!(recommendation.missing_strategies.len(), 2);
}

#[test]
fn return_qualifiers_tighten_the_rules() {
    let flip = qualifying_flip();
    let rental = rental_at(3_000.0);

    let strict = RecommendationPolicy {
        combination: Combination::RequireEither,
        min_flip_roi_percent: Some(80.0),
        min_cash_on_cash_percent: Some(35.0),
    };
    let recommendation = classify(Some(&flip), Some(&rental), StrategyFilter::Both, &strict, None);
    assert_eq!(recommendation.label, RecommendationLabel::ReviewRequired);

    let moderate = RecommendationPolicy {
        min_flip_roi_percent: Some(15.0),
        min_cash_on_cash_percent: Some(8.0),
        ..strict
    };
    let recommendation =
        classify(Some(&flip), Some(&rental), StrategyFilter::Both, &moderate, None);
    assert_eq!(recommendation.qualifying_strategies.len(), 2);
}

#[test]
fn market_context_is_attached_without_changing_label() {
    let verdict = classify_market(&sellers_signal()).expect("valid signal");
    let rental = rental_at(3_000.0);

    let recommendation = classify(
        None,
        Some(&rental),
        StrategyFilter::Both,
        &RecommendationPolicy::default(),
        Some(&verdict),
    );

    assert_eq!(recommendation.label, RecommendationLabel::GoodDeal);
    assert_eq!(
        recommendation.summary(),
        "Good rental property (Seller's Market)"
    );
}

#[test]
fn combination_parses_operator_spellings() {
    assert_eq!("either".parse::<Combination>(), Ok(Combination::RequireEither));
    assert_eq!("ALL".parse::<Combination>(), Ok(Combination::RequireBoth));
    assert!("majority".parse::<Combination>().is_err());
}
