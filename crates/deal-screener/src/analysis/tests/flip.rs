use super::common::*;
use crate::analysis::{analyze_flip, FlipCostAllowance};

#[test]
fn seventy_percent_rule_rejects_overpriced_flip() {
    let verdict = analyze_flip(200_000.0, 30_000.0, Some(320_000.0), &FlipCostAllowance::default())
        .expect("valid inputs")
        .expect("arv supplied");

    assert_eq!(verdict.max_purchase_price_70_rule, 194_000.0);
    assert!(!verdict.meets_70_rule);
    assert_eq!(verdict.total_investment, 230_000.0);
    assert_eq!(verdict.net_profit, 90_000.0);
    assert_close(verdict.estimated_roi_percent.expect("defined"), 39.13, 0.01);
}

#[test]
fn seventy_percent_rule_is_inclusive() {
    let allowance = FlipCostAllowance::default();

    let at_limit = analyze_flip(200_000.0, 10_000.0, Some(300_000.0), &allowance)
        .expect("valid")
        .expect("arv supplied");
    assert_eq!(at_limit.max_purchase_price_70_rule, 200_000.0);
    assert!(at_limit.meets_70_rule);

    let over_limit = analyze_flip(200_000.01, 10_000.0, Some(300_000.0), &allowance)
        .expect("valid")
        .expect("arv supplied");
    assert!(!over_limit.meets_70_rule);
}

#[test]
fn missing_arv_yields_no_verdict() {
    let verdict = analyze_flip(150_000.0, 20_000.0, None, &FlipCostAllowance::default())
        .expect("valid inputs");
    assert!(verdict.is_none());
}

#[test]
fn transaction_costs_reduce_net_profit_only() {
    let allowance = FlipCostAllowance {
        closing_cost_percent: 2.0,
        carrying_cost_percent: 1.0,
    };

    let verdict = analyze_flip(200_000.0, 30_000.0, Some(320_000.0), &allowance)
        .expect("valid")
        .expect("arv supplied");

    assert_eq!(verdict.potential_profit, 90_000.0);
    assert_eq!(verdict.transaction_costs, 6_000.0);
    assert_eq!(verdict.net_profit, 84_000.0);
    assert_close(verdict.profit_margin_percent.expect("defined"), 39.13, 0.01);
    assert_close(verdict.estimated_roi_percent.expect("defined"), 36.52, 0.01);
}

#[test]
fn losing_flip_reports_negative_profit() {
    let verdict = analyze_flip(250_000.0, 40_000.0, Some(260_000.0), &FlipCostAllowance::default())
        .expect("valid")
        .expect("arv supplied");

    assert_eq!(verdict.net_profit, -30_000.0);
    assert!(verdict.estimated_roi_percent.expect("defined") < 0.0);
    assert!(verdict.max_purchase_price_70_rule < 250_000.0);
}

#[test]
fn rejects_negative_inputs() {
    let allowance = FlipCostAllowance::default();

    let err = analyze_flip(150_000.0, -1.0, Some(200_000.0), &allowance).expect_err("repairs");
    assert_eq!(err.field(), "repair_cost");

    let err = analyze_flip(150_000.0, 0.0, Some(-200_000.0), &allowance).expect_err("arv");
    assert_eq!(err.field(), "after_repair_value");

    let negative_costs = FlipCostAllowance {
        closing_cost_percent: -2.0,
        carrying_cost_percent: 0.0,
    };
    let err = analyze_flip(150_000.0, 0.0, Some(200_000.0), &negative_costs)
        .expect_err("negative allowance");
    assert_eq!(err.field(), "closing_cost_percent");
}
