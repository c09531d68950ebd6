use crate::infra::{parse_date, parse_strategy, InMemoryListingCatalog, InMemoryMarketTrends};
use chrono::{Local, NaiveDate};
use clap::Args;
use deal_screener::analysis::{
    DealReport, DealScreeningService, FinancingTerms, ListingImporter, ListingQuery,
    ListingReport, MarketOverview, MarketSignal, MarketVerdict, PropertyFinancials,
    StrategyFilter,
};
use deal_screener::config::AppConfig;
use deal_screener::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DealArgs {
    /// Purchase price in dollars
    #[arg(long)]
    pub(crate) price: f64,
    /// Expected monthly rent; omit to skip the rental analysis
    #[arg(long)]
    pub(crate) rent: Option<f64>,
    /// Monthly operating expenses excluding the mortgage
    #[arg(long, default_value_t = 0.0)]
    pub(crate) expenses: f64,
    /// Up-front repair budget
    #[arg(long, default_value_t = 0.0)]
    pub(crate) repair_cost: f64,
    /// After-repair value; omit to skip the flip analysis
    #[arg(long)]
    pub(crate) arv: Option<f64>,
    /// Down payment as a percent of price (defaults to the configured financing)
    #[arg(long)]
    pub(crate) down_payment: Option<f64>,
    /// Annual interest rate in percent (defaults to the configured financing)
    #[arg(long)]
    pub(crate) rate: Option<f64>,
    /// Loan term in years (defaults to the configured financing)
    #[arg(long)]
    pub(crate) years: Option<u32>,
    /// Strategies to weigh: flip, rental, or both
    #[arg(long, default_value = "both", value_parser = parse_strategy)]
    pub(crate) strategy: StrategyFilter,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MarketArgs {
    #[arg(long)]
    pub(crate) average_price: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) average_rent: f64,
    #[arg(long)]
    pub(crate) days_on_market: f64,
    /// Year-over-year appreciation in percent
    #[arg(long)]
    pub(crate) appreciation: f64,
    /// Months of supply at the current sales pace
    #[arg(long)]
    pub(crate) inventory_months: f64,
}

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// CSV export to screen instead of the sample catalog
    #[arg(long)]
    pub(crate) listings: Option<PathBuf>,
    #[arg(long)]
    pub(crate) city: Option<String>,
    #[arg(long)]
    pub(crate) state: Option<String>,
    #[arg(long)]
    pub(crate) min_price: Option<f64>,
    #[arg(long)]
    pub(crate) max_price: Option<f64>,
    #[arg(long, default_value = "both", value_parser = parse_strategy)]
    pub(crate) strategy: StrategyFilter,
    /// Date used to age listings without a days-on-market figure (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Also print the market overview for the screened catalog
    #[arg(long)]
    pub(crate) markets: bool,
}

pub(crate) fn run_deal(args: DealArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let defaults = &config.analysis.default_financing;

    let mut property =
        PropertyFinancials::new(args.price).with_rehab(args.repair_cost, args.arv);
    if let Some(rent) = args.rent {
        property = property.with_rent(rent, args.expenses);
    }
    let financing = FinancingTerms::new(
        args.down_payment.unwrap_or(defaults.down_payment_percent),
        args.rate.unwrap_or(defaults.annual_interest_rate_percent),
        args.years.unwrap_or(defaults.loan_term_years),
    );

    let service = DealScreeningService::new(
        Arc::new(InMemoryListingCatalog::default()),
        Arc::new(InMemoryMarketTrends::default()),
        config.analysis,
    );
    let analysis = service.calculate(&property, &financing, args.strategy)?;
    let report = DealReport::from(&analysis);

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Report unavailable as JSON: {err}"),
        }
    } else {
        render_deal_report(&report);
    }

    Ok(())
}

pub(crate) fn run_market(args: MarketArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let signal = MarketSignal {
        average_price: args.average_price,
        average_rent: args.average_rent,
        average_days_on_market: args.days_on_market,
        appreciation_rate_percent: args.appreciation,
        inventory_months: args.inventory_months,
        rental_demand: None,
    };

    let service = DealScreeningService::new(
        Arc::new(InMemoryListingCatalog::default()),
        Arc::new(InMemoryMarketTrends::default()),
        config.analysis,
    );
    let verdict = service.classify_market(&signal)?;
    render_market_verdict(&verdict);
    Ok(())
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = match &args.listings {
        Some(path) => InMemoryListingCatalog::from_listings(ListingImporter::from_path(path)?),
        None => InMemoryListingCatalog::seeded(),
    };
    let service = DealScreeningService::new(
        Arc::new(catalog),
        Arc::new(InMemoryMarketTrends::seeded()),
        config.analysis,
    );

    let query = ListingQuery {
        city: args.city,
        state: args.state,
        min_price: args.min_price,
        max_price: args.max_price,
        ..ListingQuery::default()
    };
    let (listings, scores) = service.screen(&query, args.strategy)?;

    println!(
        "Screened {} listings (strategy: {})",
        listings.len(),
        args.strategy
    );
    for score in &scores {
        let listing = listings
            .iter()
            .find(|listing| listing.id == score.listing_id);
        render_listing_report(&ListingReport::from_score(score, listing));
    }

    if args.markets {
        let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
        let overview = service.market_overview(as_of)?;
        println!("\nMarket overview as of {as_of}");
        for market in &overview {
            render_market_overview(market);
        }
    }

    Ok(())
}

fn render_deal_report(report: &DealReport) {
    let financing = &report.financing;
    println!("Financing");
    println!(
        "- Down payment ${:.2} | loan ${:.2} | {} payments of ${:.2}",
        financing.down_payment,
        financing.loan_amount,
        financing.number_of_payments,
        financing.monthly_payment
    );
    println!(
        "- Cash invested ${:.2} | lifetime interest ${:.2}",
        financing.total_cash_invested, financing.total_interest
    );

    match &report.rental_analysis {
        Some(rental) => {
            println!("Rental");
            println!(
                "- Rent ${:.2} | expenses ${:.2} | cash flow ${:.2}/mo (${:.2}/yr)",
                rental.monthly_rent,
                rental.monthly_expenses,
                rental.monthly_cash_flow,
                rental.annual_cash_flow
            );
            println!(
                "- Cap rate {:.2}% | cash-on-cash {} | 1% rule {} (threshold ${:.2})",
                rental.cap_rate,
                percent_or_na(rental.cash_on_cash_return),
                pass_fail(rental.meets_1_percent_rule),
                rental.one_percent_threshold
            );
        }
        None => println!("Rental: not analyzed"),
    }

    match &report.flip_analysis {
        Some(flip) => {
            println!("Flip");
            println!(
                "- ARV ${:.2} | max purchase ${:.2} | 70% rule {}",
                flip.arv,
                flip.max_purchase_70_rule,
                pass_fail(flip.meets_70_rule)
            );
            println!(
                "- Investment ${:.2} | net profit ${:.2} | ROI {}",
                flip.total_investment,
                flip.net_profit,
                percent_or_na(flip.flip_roi)
            );
        }
        None => println!("Flip: not analyzed"),
    }

    println!(
        "Recommendation: {} ({})",
        report.recommendation.display_label, report.recommendation.summary
    );
    for gap in &report.not_applicable {
        println!("  n/a: {}", gap.detail);
    }
}

fn render_market_verdict(verdict: &MarketVerdict) {
    println!(
        "{} | prices {} ({:+.1}%/yr)",
        verdict.market_label,
        verdict.price_trend.label(),
        verdict.appreciation_rate_percent
    );
    println!(
        "- {:.0} days on market | {:.1} months of inventory | rent yield {:.2}%",
        verdict.average_days_on_market, verdict.inventory_months, verdict.rent_yield_percent
    );
    if let Some(demand) = verdict.rental_demand {
        println!("- Rental demand: {}", demand.label());
    }
}

fn render_listing_report(report: &ListingReport) {
    let address = report.address.as_deref().unwrap_or("unknown address");
    match (&report.report, &report.error) {
        (Some(deal), _) => println!(
            "- {} [{}] {}: {}",
            report.listing_id,
            address,
            deal.recommendation.display_label,
            deal.recommendation.summary
        ),
        (None, Some(error)) => println!("- {} [{}] rejected: {}", report.listing_id, address, error),
        (None, None) => println!("- {} [{}] no result", report.listing_id, address),
    }
}

fn render_market_overview(market: &MarketOverview) {
    let rent = market
        .average_rent
        .map(|rent| format!("${rent:.0}"))
        .unwrap_or_else(|| "n/a".to_string());
    let verdict = market
        .verdict
        .as_ref()
        .map(|verdict| verdict.market_label)
        .unwrap_or("no trend data");
    println!(
        "- {}, {}: {} listings | avg price ${:.0} | avg rent {} | {}",
        market.city, market.state, market.property_count, market.average_price, rent, verdict
    );
}

fn percent_or_na(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}%"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn pass_fail(passed: bool) -> &'static str {
    if passed {
        "met"
    } else {
        "not met"
    }
}
