use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::analysis::{
    deal_router, AnalysisConfig, CatalogError, DealScreeningService, DemandLevel, FinancingTerms,
    ListingCatalog, ListingQuery, ListingSnapshot, MarketSignal, MarketTrendInputs,
    MarketTrendSource, PropertyFinancials,
};

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} (+/- {tolerance}), got {actual}"
    );
}

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
}

pub(super) fn conventional_financing() -> FinancingTerms {
    FinancingTerms::new(20.0, 7.0, 30)
}

/// Purchase 200k, repairs 30k, ARV 320k.
pub(super) fn flip_property() -> PropertyFinancials {
    PropertyFinancials::new(200_000.0).with_rehab(30_000.0, Some(320_000.0))
}

/// Purchase 250k renting for 2,000 with 400 of expenses and no ARV.
pub(super) fn rental_property() -> PropertyFinancials {
    PropertyFinancials::new(250_000.0).with_rent(2_000.0, 400.0)
}

pub(super) fn listing(id: &str, city: &str, state: &str, price: f64) -> ListingSnapshot {
    ListingSnapshot {
        id: id.to_string(),
        address: format!("{id} Main St, {city}, {state}"),
        city: city.to_string(),
        state: state.to_string(),
        price,
        bedrooms: Some(3),
        property_type: Some("Single Family".to_string()),
        estimated_rent: None,
        estimated_arv: None,
        estimated_repair_cost: 0.0,
        property_taxes: 0.0,
        hoa_fees: 0.0,
        days_on_market: None,
        listing_date: None,
    }
}

/// Cleveland duplex that clears both rules.
pub(super) fn cleveland_listing() -> ListingSnapshot {
    ListingSnapshot {
        estimated_rent: Some(1_200.0),
        estimated_arv: Some(140_000.0),
        estimated_repair_cost: 20_000.0,
        property_taxes: 1_800.0,
        days_on_market: Some(67),
        bedrooms: Some(2),
        ..listing("cle-1", "Cleveland", "OH", 75_000.0)
    }
}

/// Atlanta listing that only works as a rental.
pub(super) fn atlanta_listing() -> ListingSnapshot {
    ListingSnapshot {
        estimated_rent: Some(2_100.0),
        estimated_arv: Some(280_000.0),
        estimated_repair_cost: 35_000.0,
        property_taxes: 3_200.0,
        listing_date: NaiveDate::from_ymd_opt(2024, 2, 15),
        ..listing("atl-1", "Atlanta", "GA", 185_000.0)
    }
}

/// Phoenix listing that fails both rules.
pub(super) fn phoenix_listing() -> ListingSnapshot {
    ListingSnapshot {
        estimated_rent: Some(2_800.0),
        estimated_arv: Some(420_000.0),
        estimated_repair_cost: 25_000.0,
        property_taxes: 4_500.0,
        hoa_fees: 120.0,
        days_on_market: Some(22),
        bedrooms: Some(4),
        ..listing("phx-1", "Phoenix", "AZ", 320_000.0)
    }
}

pub(super) fn sellers_signal() -> MarketSignal {
    MarketSignal {
        average_price: 300_000.0,
        average_rent: 1_500.0,
        average_days_on_market: 20.0,
        appreciation_rate_percent: 5.0,
        inventory_months: 3.0,
        rental_demand: Some(DemandLevel::High),
    }
}

#[derive(Default)]
pub(super) struct MemoryCatalog {
    listings: Vec<ListingSnapshot>,
}

impl MemoryCatalog {
    pub(super) fn with(listings: Vec<ListingSnapshot>) -> Self {
        Self { listings }
    }
}

impl ListingCatalog for MemoryCatalog {
    fn search(&self, query: &ListingQuery) -> Result<Vec<ListingSnapshot>, CatalogError> {
        Ok(self
            .listings
            .iter()
            .filter(|listing| query.matches(listing))
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &str) -> Result<Option<ListingSnapshot>, CatalogError> {
        Ok(self.listings.iter().find(|listing| listing.id == id).cloned())
    }
}

pub(super) struct OfflineCatalog;

impl ListingCatalog for OfflineCatalog {
    fn search(&self, _query: &ListingQuery) -> Result<Vec<ListingSnapshot>, CatalogError> {
        Err(CatalogError::Unavailable("mls feed offline".to_string()))
    }

    fn fetch(&self, _id: &str) -> Result<Option<ListingSnapshot>, CatalogError> {
        Err(CatalogError::Unavailable("mls feed offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryTrends {
    entries: Vec<(String, String, MarketTrendInputs)>,
}

impl MemoryTrends {
    pub(super) fn insert(mut self, city: &str, state: &str, trends: MarketTrendInputs) -> Self {
        self.entries
            .push((city.to_string(), state.to_string(), trends));
        self
    }
}

impl MarketTrendSource for MemoryTrends {
    fn trends_for(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Option<MarketTrendInputs>, CatalogError> {
        Ok(self
            .entries
            .iter()
            .find(|(known_city, known_state, _)| known_city == city && known_state == state)
            .map(|(_, _, trends)| trends.clone()))
    }
}

pub(super) fn hot_market_trends() -> MarketTrendInputs {
    MarketTrendInputs {
        appreciation_rate_percent: 6.5,
        inventory_months: 2.5,
        rental_demand: Some(DemandLevel::High),
    }
}

pub(super) fn slow_market_trends() -> MarketTrendInputs {
    MarketTrendInputs {
        appreciation_rate_percent: -1.5,
        inventory_months: 7.0,
        rental_demand: Some(DemandLevel::Low),
    }
}

pub(super) fn build_service() -> Arc<DealScreeningService<MemoryCatalog, MemoryTrends>> {
    let catalog = MemoryCatalog::with(vec![
        cleveland_listing(),
        atlanta_listing(),
        phoenix_listing(),
    ]);
    let trends = MemoryTrends::default()
        .insert("Phoenix", "AZ", hot_market_trends())
        .insert("Cleveland", "OH", slow_market_trends());

    Arc::new(DealScreeningService::new(
        Arc::new(catalog),
        Arc::new(trends),
        AnalysisConfig::default(),
    ))
}

pub(super) fn router_with_service(
    service: Arc<DealScreeningService<MemoryCatalog, MemoryTrends>>,
) -> Router {
    deal_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
