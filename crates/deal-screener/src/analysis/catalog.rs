use super::listing::{ListingQuery, ListingSnapshot};
use super::market::MarketTrendInputs;

/// Read-only view of the external property catalog.
pub trait ListingCatalog: Send + Sync {
    fn search(&self, query: &ListingQuery) -> Result<Vec<ListingSnapshot>, CatalogError>;
    fn fetch(&self, id: &str) -> Result<Option<ListingSnapshot>, CatalogError>;
}

/// Source of market trend figures that listings alone cannot provide.
pub trait MarketTrendSource: Send + Sync {
    fn trends_for(&self, city: &str, state: &str)
        -> Result<Option<MarketTrendInputs>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("listing not found")]
    NotFound,
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
