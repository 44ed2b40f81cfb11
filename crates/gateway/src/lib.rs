//! # Quantview Gateway
//!
//! The public-facing HTTP entry point. It owns no analytics logic at all:
//! every request is forwarded to the analytics service through the
//! [`AnalyticsApi`] trait, and the one composite endpoint
//! (`/api/comprehensive-analysis/:symbol`) fans out to several upstream
//! routes concurrently and merges the answers.

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};
use tracing;

pub mod client;
pub mod error;
pub mod handlers;

// --- Public API ---
pub use client::{AnalyticsApi, HttpAnalyticsClient};
pub use error::GatewayError;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub api: Box<dyn AnalyticsApi>,
}

/// The main function to configure and run the gateway.
pub async fn run_server(
    addr: SocketAddr,
    analytics_base_url: &str,
    request_timeout: Duration,
) -> anyhow::Result<()> {
    let api = HttpAnalyticsClient::new(analytics_base_url, request_timeout);
    let app_state = Arc::new(AppState { api: Box::new(api) });
    serve(addr, app_state).await
}

/// Binds the listener and serves the router. Split from [`run_server`] so a
/// caller can supply its own state.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    let app = router(state)
        .layer(cors)
        // This middleware logs information about every incoming request.
        .layer(TraceLayer::new_for_http());

    tracing::info!("Gateway listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/api/health", get(handlers::health))
        .route(
            "/api/technical-indicators/:symbol",
            post(handlers::technical_indicators),
        )
        .route("/api/assess-risk/:symbol", post(handlers::assess_risk))
        .route("/api/find-opportunities", post(handlers::find_opportunities))
        .route("/api/portfolio-analysis", post(handlers::portfolio_analysis))
        .route(
            "/api/comprehensive-analysis/:symbol",
            post(handlers::comprehensive_analysis),
        )
        .route("/api/assets", get(handlers::get_assets))
        .route("/api/assets/:symbol", get(handlers::get_asset))
        .route(
            "/api/assets/:symbol/price-history",
            get(handlers::get_price_history),
        )
        .with_state(state)
}
