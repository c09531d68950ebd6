use chrono::NaiveDate;
use deal_screener::analysis::{
    CatalogError, DemandLevel, ListingCatalog, ListingQuery, ListingSnapshot, MarketTrendInputs,
    MarketTrendSource, StrategyFilter,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read-only listing catalog, seeded with sample listings or a CSV export at startup.
#[derive(Default, Clone)]
pub(crate) struct InMemoryListingCatalog {
    listings: Arc<Vec<ListingSnapshot>>,
}

impl InMemoryListingCatalog {
    pub(crate) fn from_listings(listings: Vec<ListingSnapshot>) -> Self {
        Self {
            listings: Arc::new(listings),
        }
    }

    pub(crate) fn seeded() -> Self {
        Self::from_listings(sample_listings())
    }
}

impl ListingCatalog for InMemoryListingCatalog {
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

/// Market trend figures keyed by city and state.
#[derive(Default, Clone)]
pub(crate) struct InMemoryMarketTrends {
    by_market: Arc<HashMap<(String, String), MarketTrendInputs>>,
}

impl InMemoryMarketTrends {
    pub(crate) fn seeded() -> Self {
        let entries = [
            ("Atlanta", "GA", 5.2, 3.1, DemandLevel::High),
            ("Phoenix", "AZ", 6.8, 2.4, DemandLevel::High),
            ("Cleveland", "OH", -0.4, 7.5, DemandLevel::Moderate),
            ("Memphis", "TN", 2.1, 5.0, DemandLevel::Moderate),
            ("Jacksonville", "FL", 4.5, 2.9, DemandLevel::High),
            ("Birmingham", "AL", 1.2, 6.2, DemandLevel::Low),
        ];

        let by_market = entries
            .into_iter()
            .map(|(city, state, appreciation, inventory, demand)| {
                (
                    (city.to_string(), state.to_string()),
                    MarketTrendInputs {
                        appreciation_rate_percent: appreciation,
                        inventory_months: inventory,
                        rental_demand: Some(demand),
                    },
                )
            })
            .collect();

        Self {
            by_market: Arc::new(by_market),
        }
    }
}

impl MarketTrendSource for InMemoryMarketTrends {
    fn trends_for(
        &self,
        city: &str,
        state: &str,
    ) -> Result<Option<MarketTrendInputs>, CatalogError> {
        Ok(self
            .by_market
            .get(&(city.to_string(), state.to_string()))
            .cloned())
    }
}

#[allow(clippy::too_many_arguments)]
fn sample_listing(
    id: &str,
    address: &str,
    city: &str,
    state: &str,
    price: f64,
    bedrooms: u8,
    rent: f64,
    arv: f64,
    repairs: f64,
    taxes: f64,
    hoa: f64,
    days_on_market: u32,
    listed: (i32, u32, u32),
) -> ListingSnapshot {
    ListingSnapshot {
        id: id.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        price,
        bedrooms: Some(bedrooms),
        property_type: Some("Single Family".to_string()),
        estimated_rent: Some(rent),
        estimated_arv: Some(arv),
        estimated_repair_cost: repairs,
        property_taxes: taxes,
        hoa_fees: hoa,
        days_on_market: Some(days_on_market),
        listing_date: NaiveDate::from_ymd_opt(listed.0, listed.1, listed.2),
    }
}

pub(crate) fn sample_listings() -> Vec<ListingSnapshot> {
    vec![
        sample_listing(
            "atl-30309-1234",
            "1234 Peachtree St, Atlanta, GA 30309",
            "Atlanta",
            "GA",
            185_000.0,
            3,
            2_100.0,
            280_000.0,
            35_000.0,
            3_200.0,
            0.0,
            45,
            (2024, 2, 15),
        ),
        sample_listing(
            "phx-85016-5678",
            "5678 Desert View Dr, Phoenix, AZ 85016",
            "Phoenix",
            "AZ",
            320_000.0,
            4,
            2_800.0,
            420_000.0,
            25_000.0,
            4_500.0,
            120.0,
            22,
            (2024, 2, 28),
        ),
        sample_listing(
            "cle-44102-9012",
            "9012 Maple Ave, Cleveland, OH 44102",
            "Cleveland",
            "OH",
            75_000.0,
            2,
            1_200.0,
            140_000.0,
            20_000.0,
            1_800.0,
            0.0,
            67,
            (2024, 1, 20),
        ),
        sample_listing(
            "mem-38104-3456",
            "3456 Oak Street, Memphis, TN 38104",
            "Memphis",
            "TN",
            95_000.0,
            3,
            1_400.0,
            160_000.0,
            15_000.0,
            2_100.0,
            0.0,
            35,
            (2024, 2, 10),
        ),
        sample_listing(
            "jax-32225-7890",
            "7890 Pine Ridge Rd, Jacksonville, FL 32225",
            "Jacksonville",
            "FL",
            245_000.0,
            3,
            2_200.0,
            310_000.0,
            12_000.0,
            3_800.0,
            85.0,
            18,
            (2024, 3, 1),
        ),
        sample_listing(
            "bhm-35209-2468",
            "2468 Sunset Blvd, Birmingham, AL 35209",
            "Birmingham",
            "AL",
            125_000.0,
            4,
            1_650.0,
            190_000.0,
            28_000.0,
            2_400.0,
            0.0,
            52,
            (2024, 1, 28),
        ),
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_strategy(raw: &str) -> Result<StrategyFilter, String> {
    raw.parse()
}
