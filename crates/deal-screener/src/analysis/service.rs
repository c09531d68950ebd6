use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::catalog::{CatalogError, ListingCatalog, MarketTrendSource};
use super::domain::{DealError, FinancingTerms, PropertyFinancials, StrategyFilter};
use super::listing::{ListingQuery, ListingSnapshot};
use super::market::{MarketSignal, MarketVerdict};
use super::{AnalysisConfig, DealAnalysis, DealAnalyzer, ListingScore};

/// Service composing the listing catalog, market trend feed, and analyzer.
pub struct DealScreeningService<C, M> {
    catalog: Arc<C>,
    markets: Arc<M>,
    analyzer: Arc<DealAnalyzer>,
}

/// Per-geography market summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketOverview {
    pub city: String,
    pub state: String,
    pub property_count: usize,
    pub average_price: f64,
    pub average_rent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<MarketVerdict>,
}

impl<C, M> DealScreeningService<C, M>
where
    C: ListingCatalog + 'static,
    M: MarketTrendSource + 'static,
{
    pub fn new(catalog: Arc<C>, markets: Arc<M>, config: AnalysisConfig) -> Self {
        Self {
            catalog,
            markets,
            analyzer: Arc::new(DealAnalyzer::new(config)),
        }
    }

    pub fn analyzer(&self) -> &DealAnalyzer {
        &self.analyzer
    }

    /// What-if calculation for a hypothetical deal.
    pub fn calculate(
        &self,
        property: &PropertyFinancials,
        financing: &FinancingTerms,
        filter: StrategyFilter,
    ) -> Result<DealAnalysis, DealServiceError> {
        Ok(self.analyzer.compute_deal(property, financing, filter)?)
    }

    /// Scores every listing the catalog returns for `query`.
    pub fn screen(
        &self,
        query: &ListingQuery,
        filter: StrategyFilter,
    ) -> Result<(Vec<ListingSnapshot>, Vec<ListingScore>), DealServiceError> {
        let listings = self.catalog.search(query)?;
        let scores = self.analyzer.score_batch(&listings, filter);
        info!(
            listings = listings.len(),
            strategy = %filter,
            "screened catalog listings"
        );
        Ok((listings, scores))
    }

    /// Analyzes one listing, attaching its market context when trends are known.
    pub fn listing_analysis(
        &self,
        id: &str,
        filter: StrategyFilter,
        as_of: NaiveDate,
    ) -> Result<(ListingSnapshot, DealAnalysis), DealServiceError> {
        let listing = self.catalog.fetch(id)?.ok_or(CatalogError::NotFound)?;

        let market = self.market_for(&listing, as_of)?;
        let analysis = self
            .analyzer
            .score_listing(&listing, filter, market.as_ref())?;

        Ok((listing, analysis))
    }

    pub fn classify_market(&self, signal: &MarketSignal) -> Result<MarketVerdict, DealServiceError> {
        Ok(self.analyzer.classify_market(signal)?)
    }

    /// Groups the catalog by city and state and classifies each market that has
    /// trend data.
    pub fn market_overview(&self, as_of: NaiveDate) -> Result<Vec<MarketOverview>, DealServiceError> {
        let listings = self.catalog.search(&ListingQuery::default())?;

        let mut by_market: BTreeMap<(String, String), Vec<ListingSnapshot>> = BTreeMap::new();
        for listing in listings {
            by_market.entry(listing.market_key()).or_default().push(listing);
        }

        let mut overview = Vec::with_capacity(by_market.len());
        for ((city, state), listings) in by_market {
            let trends = self.markets.trends_for(&city, &state)?;
            let signal = trends
                .as_ref()
                .and_then(|trends| MarketSignal::from_listings(&listings, trends, as_of));
            let verdict = match &signal {
                Some(signal) => match self.analyzer.classify_market(signal) {
                    Ok(verdict) => Some(verdict),
                    Err(err) => {
                        warn!(%city, %state, error = %err, "market signal rejected");
                        None
                    }
                },
                None => None,
            };

            let rents: Vec<f64> = listings
                .iter()
                .filter_map(|listing| listing.estimated_rent)
                .collect();
            let average_rent = if rents.is_empty() {
                None
            } else {
                Some(rents.iter().sum::<f64>() / rents.len() as f64)
            };

            overview.push(MarketOverview {
                property_count: listings.len(),
                average_price: listings.iter().map(|listing| listing.price).sum::<f64>()
                    / listings.len() as f64,
                average_rent,
                city,
                state,
                verdict,
            });
        }

        Ok(overview)
    }

    fn market_for(
        &self,
        listing: &ListingSnapshot,
        as_of: NaiveDate,
    ) -> Result<Option<MarketVerdict>, DealServiceError> {
        let Some(trends) = self.markets.trends_for(&listing.city, &listing.state)? else {
            return Ok(None);
        };

        let query = ListingQuery {
            city: Some(listing.city.clone()),
            state: Some(listing.state.clone()),
            ..ListingQuery::default()
        };
        let peers = self.catalog.search(&query)?;

        match MarketSignal::from_listings(&peers, &trends, as_of) {
            Some(signal) => Ok(Some(self.analyzer.classify_market(&signal)?)),
            None => Ok(None),
        }
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum DealServiceError {
    #[error(transparent)]
    Analysis(#[from] DealError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
