use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::catalog::{CatalogError, ListingCatalog, MarketTrendSource};
use super::domain::{FinancingTerms, PropertyFinancials, StrategyFilter};
use super::listing::ListingQuery;
use super::market::MarketSignal;
use super::service::{DealScreeningService, DealServiceError};
use super::views::{DealReport, ListingReport};

/// Body of a what-if deal calculation.
#[derive(Debug, Deserialize)]
pub struct DealCalculationRequest {
    pub property: PropertyFinancials,
    pub financing: FinancingTerms,
    #[serde(default)]
    pub strategy: StrategyFilter,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingSearchParams {
    #[serde(default)]
    pub strategy: StrategyFilter,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub min_bedrooms: Option<u8>,
    #[serde(default)]
    pub property_type: Option<String>,
}

impl ListingSearchParams {
    fn query(&self) -> ListingQuery {
        ListingQuery {
            city: self.city.clone(),
            state: self.state.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            min_bedrooms: self.min_bedrooms,
            property_type: self.property_type.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StrategyParams {
    #[serde(default)]
    pub strategy: StrategyFilter,
}

/// Router builder exposing the deal calculator, listing screening, and market
/// classification endpoints.
pub fn deal_router<C, M>(service: Arc<DealScreeningService<C, M>>) -> Router
where
    C: ListingCatalog + 'static,
    M: MarketTrendSource + 'static,
{
    Router::new()
        .route("/api/v1/deals/calculate", post(calculate_handler::<C, M>))
        .route("/api/v1/listings", get(listings_handler::<C, M>))
        .route(
            "/api/v1/listings/:listing_id/analysis",
            get(listing_analysis_handler::<C, M>),
        )
        .route("/api/v1/markets", get(markets_handler::<C, M>))
        .route("/api/v1/markets/classify", post(classify_market_handler::<C, M>))
        .with_state(service)
}

pub(crate) async fn calculate_handler<C, M>(
    State(service): State<Arc<DealScreeningService<C, M>>>,
    axum::Json(request): axum::Json<DealCalculationRequest>,
) -> Response
where
    C: ListingCatalog + 'static,
    M: MarketTrendSource + 'static,
{
    match service.calculate(&request.property, &request.financing, request.strategy) {
        Ok(analysis) => {
            let report = DealReport::from(&analysis);
            (StatusCode::OK, axum::Json(report)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn listings_handler<C, M>(
    State(service): State<Arc<DealScreeningService<C, M>>>,
    Query(params): Query<ListingSearchParams>,
) -> Response
where
    C: ListingCatalog + 'static,
    M: MarketTrendSource + 'static,
{
    match service.screen(&params.query(), params.strategy) {
        Ok((listings, scores)) => {
            let reports: Vec<ListingReport> = scores
                .iter()
                .map(|score| {
                    let listing = listings
                        .iter()
                        .find(|listing| listing.id == score.listing_id);
                    ListingReport::from_score(score, listing)
                })
                .collect();
            let payload = json!({
                "count": reports.len(),
                "listings": reports,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn listing_analysis_handler<C, M>(
    State(service): State<Arc<DealScreeningService<C, M>>>,
    Path(listing_id): Path<String>,
    Query(params): Query<StrategyParams>,
) -> Response
where
    C: ListingCatalog + 'static,
    M: MarketTrendSource + 'static,
{
    let today = Local::now().date_naive();
    match service.listing_analysis(&listing_id, params.strategy, today) {
        Ok((listing, analysis)) => {
            let payload = json!({
                "listing": listing,
                "analysis": DealReport::from(&analysis),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn markets_handler<C, M>(
    State(service): State<Arc<DealScreeningService<C, M>>>,
) -> Response
where
    C: ListingCatalog + 'static,
    M: MarketTrendSource + 'static,
{
    let today = Local::now().date_naive();
    match service.market_overview(today) {
        Ok(markets) => (StatusCode::OK, axum::Json(json!({ "markets": markets }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn classify_market_handler<C, M>(
    State(service): State<Arc<DealScreeningService<C, M>>>,
    axum::Json(signal): axum::Json<MarketSignal>,
) -> Response
where
    C: ListingCatalog + 'static,
    M: MarketTrendSource + 'static,
{
    match service.classify_market(&signal) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DealServiceError) -> Response {
    let status = match &err {
        DealServiceError::Analysis(_) => StatusCode::BAD_REQUEST,
        DealServiceError::Catalog(CatalogError::NotFound) => StatusCode::NOT_FOUND,
        DealServiceError::Catalog(CatalogError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let payload = match &err {
        DealServiceError::Analysis(analysis) => json!({
            "error": err.to_string(),
            "field": analysis.field(),
        }),
        _ => json!({ "error": err.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}
