//! # Quantview Analytics Service
//!
//! The HTTP service that exposes the analytics library over a small JSON
//! API: technical indicators, risk assessment, opportunity scoring and
//! portfolio analysis, plus the asset catalogue backing them.
//!
//! ## Architectural Principles
//!
//! - **Thin Handlers:** Every endpoint fetches data through the failover
//!   provider, calls into the pure `analytics` crate, and wraps the result
//!   in the standard response envelope. No business math lives here.
//! - **Always Available:** The service starts with a lazy pool and the
//!   provider substitutes synthetic data when the store is down, so every
//!   analytics endpoint keeps answering (tagged `data_origin: synthetic`).

use analytics::GaussianNoise;
use axum::{
    routing::{get, post},
    Router,
};
use database::MarketRepository;
use provider::{DbProvider, FailoverProvider, MarketDataProvider};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};
use tracing;

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    /// Price history, profiles and quotes, with synthetic failover.
    pub provider: FailoverProvider<Box<dyn MarketDataProvider>>,
    /// Kept separately from the provider so `/health` can ping the pool
    /// directly. `None` when the service runs without a store (tests).
    pub repo: Option<MarketRepository>,
    /// The shared perturbation source for the opportunity heuristics.
    pub noise: Mutex<GaussianNoise>,
    pub risk_free_rate: f64,
}

/// The main function to configure and run the analytics service.
///
/// The pool is created lazily and a migration failure is only logged: with
/// the store unreachable the service still starts and serves synthetic data.
pub async fn run_server(addr: SocketAddr, risk_free_rate: f64) -> anyhow::Result<()> {
    let db_pool = database::connect_lazy()?;
    if let Err(err) = database::run_migrations(&db_pool).await {
        tracing::warn!(error = %err, "Migrations failed; continuing with synthetic fallback only.");
    }
    let repo = MarketRepository::new(db_pool);
    let provider = FailoverProvider::new(
        Box::new(DbProvider::new(repo.clone())) as Box<dyn MarketDataProvider>
    );

    let app_state = Arc::new(AppState {
        provider,
        repo: Some(repo),
        noise: Mutex::new(GaussianNoise::from_entropy()),
        risk_free_rate,
    });

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

    tracing::info!("Analytics service listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router over the given state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        .route(
            "/api/technical-indicators/:symbol",
            post(handlers::technical_indicators),
        )
        .route("/api/assess-risk/:symbol", post(handlers::assess_risk))
        .route("/api/find-opportunities", post(handlers::find_opportunities))
        .route("/api/portfolio-analysis", post(handlers::portfolio_analysis))
        .route("/api/assets", get(handlers::get_assets))
        .route("/api/assets/:symbol", get(handlers::get_asset))
        .route(
            "/api/assets/:symbol/price-history",
            get(handlers::get_price_history),
        )
        .with_state(state)
}
