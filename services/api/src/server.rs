use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryListingCatalog, InMemoryMarketTrends};
use crate::routes::with_deal_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use deal_screener::analysis::{DealScreeningService, ListingImporter};
use deal_screener::config::AppConfig;
use deal_screener::error::AppError;
use deal_screener::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = match args.listings.take() {
        Some(path) => {
            let listings = ListingImporter::from_path(&path)?;
            info!(count = listings.len(), path = %path.display(), "loaded listing export");
            InMemoryListingCatalog::from_listings(listings)
        }
        None => InMemoryListingCatalog::seeded(),
    };

    let screening_service = Arc::new(DealScreeningService::new(
        Arc::new(catalog),
        Arc::new(InMemoryMarketTrends::seeded()),
        config.analysis.clone(),
    ));

    let app = with_deal_routes(screening_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        combination = ?config.analysis.recommendation.combination,
        "deal screening service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
