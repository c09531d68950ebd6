use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use deal_screener::analysis::{
    deal_router, DealScreeningService, ListingCatalog, MarketTrendSource,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_deal_routes<C, M>(service: Arc<DealScreeningService<C, M>>) -> axum::Router
where
    C: ListingCatalog + 'static,
    M: MarketTrendSource + 'static,
{
    deal_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryListingCatalog, InMemoryMarketTrends};
    use axum::body::Body;
    use axum::http::Request;
    use deal_screener::analysis::AnalysisConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn seeded_service() -> Arc<DealScreeningService<InMemoryListingCatalog, InMemoryMarketTrends>>
    {
        Arc::new(DealScreeningService::new(
            Arc::new(InMemoryListingCatalog::seeded()),
            Arc::new(InMemoryMarketTrends::seeded()),
            AnalysisConfig::default(),
        ))
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        let state = app_state(false);
        let response = readiness_endpoint(Extension(state.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = readiness_endpoint(Extension(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_prometheus_text() {
        let response = metrics_endpoint(Extension(app_state(true)))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).map(|value| value.as_bytes()),
            Some("text/plain; version=0.0.4".as_bytes())
        );
    }

    #[tokio::test]
    async fn health_route_is_mounted_alongside_deal_routes() {
        let router = with_deal_routes(seeded_service());

        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn seeded_markets_are_classified() {
        let router = with_deal_routes(seeded_service());

        let response = router
            .oneshot(Request::get("/api/v1/markets").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        let markets = payload["markets"].as_array().expect("market list");
        assert_eq!(markets.len(), 6);

        let phoenix = markets
            .iter()
            .find(|market| market["city"] == "Phoenix")
            .expect("phoenix listed");
        assert_eq!(phoenix["verdict"]["market_type"], "sellers_market");

        let cleveland = markets
            .iter()
            .find(|market| market["city"] == "Cleveland")
            .expect("cleveland listed");
        assert_eq!(cleveland["verdict"]["market_type"], "buyers_market");
    }

    #[tokio::test]
    async fn seeded_listings_can_be_screened_for_flips() {
        let router = with_deal_routes(seeded_service());

        let response = router
            .oneshot(
                Request::get("/api/v1/listings?strategy=flip&max_price=130000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["count"], 3);
        for listing in payload["listings"].as_array().expect("listing list") {
            assert!(listing["report"]["flip_analysis"].is_object());
        }
    }
}
