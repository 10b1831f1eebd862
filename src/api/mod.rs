//! Trade Similarity REST API
//!
//! HTTP layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /` - Dashboard page
//!
//! ## Charts
//! - `GET /api/v1/options` - Selector options and default selection
//! - `GET /api/v1/heatmap?flow=&year=` - Heatmap figure
//! - `GET /api/v1/heatmap/export?flow=&year=` - Heatmap slice as CSV
//! - `GET /api/v1/slopechart?flow=&partner=` - Slope-chart figure
//!
//! ## Dataset
//! - `GET /api/v1/dataset` - Selection domains and table counts
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /ws` - Interactive session (control changes in, figures out)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trade_similarity::api::{serve, ApiConfig, AppState};
//! use trade_similarity::binder::SelectionBinder;
//! use trade_similarity::data::{DatasetSource, JsonDirSource};
//! use trade_similarity::dispatch::Selection;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = Arc::new(JsonDirSource::new("data").load()?);
//!     let config = ApiConfig::default();
//!
//!     let binder = SelectionBinder::new(dataset);
//!     let state = AppState::new(binder, Selection::default(), config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Chart routes
        .route("/options", get(routes::charts::selector_options))
        .route("/heatmap", get(routes::charts::heatmap))
        .route("/heatmap/export", get(routes::export::export_heatmap))
        .route("/slopechart", get(routes::charts::slopechart))
        // Dataset routes
        .route("/dataset", get(routes::dataset::dataset_summary));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::dashboard::index))
        .route("/ws", get(websocket_handler))
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured, otherwise an allow-list
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Trade Similarity dashboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dashboard server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::SelectionBinder;
    use crate::data::{Dataset, FlowType, HeatmapMatrix, LineSeries};
    use crate::dispatch::Selection;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_test_app_with(ApiConfig::default())
    }

    fn create_test_app_with(config: ApiConfig) -> Router {
        let dataset = Dataset::builder()
            .years(["2016", "2017"])
            .partners(["RU", "ME"])
            .member_state("DE", false)
            .member_state("MT", true)
            .country_name("RU", "Russia")
            .heatmap(
                FlowType::Export,
                "2017",
                HeatmapMatrix {
                    x: vec!["RU".into(), "ME".into()],
                    y: vec!["DE".into(), "MT".into()],
                    z: vec![vec![Some(0.93), Some(0.6)], vec![Some(0.4), Some(0.2)]],
                },
            )
            .slope(
                FlowType::Export,
                "RU",
                vec![LineSeries::new("MT").point("2016", 0.3).point("2017", 0.35)],
            )
            .build()
            .unwrap();

        let binder = SelectionBinder::new(Arc::new(dataset));
        let state = AppState::new(
            binder,
            Selection::new("2017", FlowType::Export, "RU"),
            config,
        );
        build_router(state)
    }

    async fn get_status(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    async fn get_json(uri: &str) -> serde_json::Value {
        let response = create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        assert_eq!(get_status("/health/live").await, StatusCode::OK);
        assert_eq!(get_status("/health/ready").await, StatusCode::OK);
        assert_eq!(get_status("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        assert_eq!(get_status("/").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_heatmap_defaults() {
        let json = get_json("/api/v1/heatmap").await;
        assert_eq!(json["year"], "2017");
        assert_eq!(json["data"][0]["type"], "heatmap");
        assert_eq!(json["data"][0]["z"][0][0], 0.93);
        assert_eq!(json["data"][0]["zauto"], false);
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], "Partner");
    }

    #[tokio::test]
    async fn test_heatmap_lowercase_flow() {
        let json = get_json("/api/v1/heatmap?flow=export&year=2017").await;
        assert_eq!(json["flow"], "EXPORT");
    }

    #[tokio::test]
    async fn test_heatmap_errors() {
        assert_eq!(
            get_status("/api/v1/heatmap?flow=EXPORT&year=1999").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status("/api/v1/heatmap?flow=TRANSIT&year=2017").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status("/api/v1/heatmap?flow=EXPORT&year=2016").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_slopechart() {
        let json = get_json("/api/v1/slopechart?partner=RU").await;
        assert_eq!(json["data"][0]["name"], "MT");
        assert_eq!(json["layout"]["hovermode"], "closest");
        assert_eq!(json["partner"]["name"], "Russia");

        assert_eq!(
            get_status("/api/v1/slopechart?partner=XX").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status("/api/v1/slopechart?partner=ME").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/slopechart?partner=ME")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"]["code"], "DATA_NOT_FOUND");
        assert!(json["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_options() {
        let json = get_json("/api/v1/options").await;
        assert_eq!(json["years"][1]["value"], "2017");
        assert_eq!(json["flows"][0]["value"], "EXPORT");
        assert_eq!(json["partners"][0]["label"], "Russia");
        assert_eq!(json["defaults"]["partner"], "RU");
    }

    #[tokio::test]
    async fn test_dataset_summary() {
        let json = get_json("/api/v1/dataset").await;
        assert_eq!(json["new_member_states"], serde_json::json!(["MT"]));
        assert_eq!(json["stats"]["heatmap_slices"], 1);
    }

    #[tokio::test]
    async fn test_heatmap_export() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/heatmap/export?flow=EXPORT&year=2017")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "text/csv");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("reporter,partner,value\n"));
        assert!(text.contains("MT,ME,0.2\n"));
    }

    #[tokio::test]
    async fn test_cors_allow_list() {
        let config = ApiConfig {
            cors_origins: vec!["http://localhost:8050".to_string(), "bad\norigin".to_string()],
            ..ApiConfig::default()
        };

        let request = |origin: &str| {
            Request::builder()
                .uri("/health/live")
                .header("origin", origin)
                .body(Body::empty())
                .unwrap()
        };

        let allowed = create_test_app_with(config.clone())
            .oneshot(request("http://localhost:8050"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()["access-control-allow-origin"],
            "http://localhost:8050"
        );

        let denied = create_test_app_with(config)
            .oneshot(request("http://elsewhere.example"))
            .await
            .unwrap();
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }
}
