use crate::{error::AppError, AppState};
use analytics::indicators::MIN_INDICATOR_POINTS;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use provider::synthetic;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// RFC 3339 timestamp stamped onto every response envelope.
fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// # GET /
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "quantview-analytics",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// # GET /health
/// Reports the store connectivity without ever failing the probe itself:
/// a down store means degraded (synthetic) operation, not a dead service.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let database = match &state.repo {
        Some(repo) => match repo.ping().await {
            Ok(()) => "connected",
            Err(_) => "disconnected",
        },
        None => "disconnected",
    };

    Json(json!({
        "status": "healthy",
        "database": database,
        "timestamp": timestamp(),
    }))
}

/// # POST /api/technical-indicators/:symbol
pub async fn technical_indicators(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, AppError> {
    let symbol = symbol.to_uppercase();
    let (prices, origin) = state
        .provider
        .price_history(&symbol, 100, synthetic::INDICATOR_SIGMA)
        .await;

    // A short real series still gets the fixed default snapshot, anchored
    // to the symbol's reference price rather than a generic base.
    let indicators = if prices.len() < MIN_INDICATOR_POINTS {
        analytics::default_indicators(synthetic::base_price(&symbol))
    } else {
        analytics::compute_indicators(&prices)
    };

    Ok(Json(json!({
        "success": true,
        "symbol": symbol,
        "indicators": indicators,
        "data_origin": origin,
        "timestamp": timestamp(),
    })))
}

/// # POST /api/assess-risk/:symbol
pub async fn assess_risk(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, AppError> {
    let symbol = symbol.to_uppercase();
    let (prices, origin) = state
        .provider
        .price_history(&symbol, 252, synthetic::RISK_SIGMA)
        .await;
    let (profile, _) = state.provider.asset_profile(&symbol).await;

    let assessment = analytics::assess_risk_with_rate(&prices, &profile, state.risk_free_rate);

    Ok(Json(json!({
        "success": true,
        "symbol": symbol,
        "risk_assessment": assessment,
        "data_origin": origin,
        "timestamp": timestamp(),
    })))
}

/// # POST /api/find-opportunities
/// Scores the whole catalogue and returns the top candidates above the
/// opportunity threshold, strongest first.
pub async fn find_opportunities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let (quotes, origin) = state.provider.list_assets().await;

    let mut opportunities = {
        let mut noise = state.noise.lock().expect("noise mutex poisoned");
        quotes
            .iter()
            .map(|quote| {
                let price = quote
                    .current_price
                    .unwrap_or_else(|| synthetic::base_price(&quote.symbol));
                analytics::score_opportunity(&quote.profile(), price, &mut *noise)
            })
            .filter(|opp| opp.score > 60.0)
            .collect::<Vec<_>>()
    };
    opportunities.sort_by(|a, b| b.score.partial_cmp(&a.score).expect("scores are finite"));
    opportunities.truncate(10);
    let count = opportunities.len();

    Ok(Json(json!({
        "success": true,
        "opportunities": opportunities,
        "count": count,
        "data_origin": origin,
        "timestamp": timestamp(),
    })))
}

/// # POST /api/portfolio-analysis
/// Body: a JSON array of symbols. Unknown symbols are dropped; an empty
/// intersection is a 404.
pub async fn portfolio_analysis(
    State(state): State<Arc<AppState>>,
    Json(symbols): Json<Vec<String>>,
) -> Result<Json<Value>, AppError> {
    let symbols: Vec<String> = symbols.iter().map(|s| s.to_uppercase()).collect();
    let (quotes, origin) = state.provider.list_assets().await;

    let holdings: Vec<(core_types::AssetProfile, f64)> = quotes
        .iter()
        .filter(|quote| symbols.contains(&quote.symbol))
        .map(|quote| {
            let price = quote
                .current_price
                .unwrap_or_else(|| synthetic::base_price(&quote.symbol));
            (quote.profile(), price)
        })
        .collect();

    let analysis = {
        let mut noise = state.noise.lock().expect("noise mutex poisoned");
        analytics::analyze_portfolio(&holdings, &mut *noise)?
    };

    Ok(Json(json!({
        "success": true,
        "portfolio": symbols,
        "analysis": analysis,
        "data_origin": origin,
        "timestamp": timestamp(),
    })))
}

/// # GET /api/assets
pub async fn get_assets(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let (assets, origin) = state.provider.list_assets().await;
    let count = assets.len();

    Ok(Json(json!({
        "success": true,
        "assets": assets,
        "count": count,
        "data_origin": origin,
        "timestamp": timestamp(),
    })))
}

/// # GET /api/assets/:symbol
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, AppError> {
    let symbol = symbol.to_uppercase();
    let (asset, origin) = state.provider.asset_detail(&symbol).await?;

    Ok(Json(json!({
        "success": true,
        "asset": asset,
        "data_origin": origin,
        "timestamp": timestamp(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_history_days")]
    days: i64,
}
fn default_history_days() -> i64 {
    30
}

/// # GET /api/assets/:symbol/price-history?days=30
pub async fn get_price_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Value>, AppError> {
    let symbol = symbol.to_uppercase();
    let (rows, origin) = state.provider.recent_prices(&symbol, params.days.max(0)).await;
    let count = rows.len();

    Ok(Json(json!({
        "success": true,
        "symbol": symbol,
        "price_history": rows,
        "count": count,
        "data_origin": origin,
        "timestamp": timestamp(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::GaussianNoise;
    use async_trait::async_trait;
    use core_types::{AssetDetail, AssetProfile, AssetQuote, PricePoint};
    use provider::{FailoverProvider, MarketDataProvider, ProviderError};
    use std::sync::Mutex;

    /// A reachable store holding two assets with 20-day histories.
    struct FakeStore;

    fn quote(symbol: &str, name: &str, sector: &str, cap: i64, price: f64) -> AssetQuote {
        AssetQuote {
            symbol: symbol.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            industry: "Test".to_string(),
            market_cap: cap,
            current_price: Some(price),
            change: Some(0.0),
            change_percent: Some(0.0),
        }
    }

    #[async_trait]
    impl MarketDataProvider for FakeStore {
        async fn price_history(&self, _symbol: &str, _days: i32) -> Result<Vec<f64>, ProviderError> {
            Ok((0..20).map(|i| 100.0 + i as f64).collect())
        }

        async fn asset_profile(&self, symbol: &str) -> Result<AssetProfile, ProviderError> {
            Ok(AssetProfile::new(symbol, "Test Corp", "Technology", "Software", 3_000_000_000_000)
                .expect("valid profile"))
        }

        async fn asset_detail(&self, symbol: &str) -> Result<AssetDetail, ProviderError> {
            if symbol == "AAPL" {
                let q = quote("AAPL", "Apple Inc.", "Technology", 3_000_000_000_000, 150.25);
                Ok(AssetDetail {
                    profile: q.profile(),
                    current_price: q.current_price,
                    change: q.change,
                    change_percent: q.change_percent,
                })
            } else {
                Err(ProviderError::NotFound(symbol.to_string()))
            }
        }

        async fn list_assets(&self) -> Result<Vec<AssetQuote>, ProviderError> {
            Ok(vec![
                quote("AAPL", "Apple Inc.", "Technology", 3_000_000_000_000, 150.25),
                quote("TSLA", "Tesla, Inc.", "Consumer Cyclical", 800_000_000_000, 240.80),
            ])
        }

        async fn recent_prices(
            &self,
            _symbol: &str,
            limit: i64,
        ) -> Result<Vec<PricePoint>, ProviderError> {
            let today = Utc::now().date_naive();
            Ok((0..limit)
                .map(|i| PricePoint {
                    date: today - chrono::Days::new(i as u64),
                    close_price: 100.0,
                    volume: 1_000_000,
                })
                .collect())
        }
    }

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            provider: FailoverProvider::with_seed(
                Box::new(FakeStore) as Box<dyn MarketDataProvider>,
                42,
            ),
            repo: None,
            noise: Mutex::new(GaussianNoise::seeded(7)),
            risk_free_rate: 0.02,
        })
    }

    #[tokio::test]
    async fn indicators_envelope_has_store_origin() {
        let state = test_state();
        let Json(body) = technical_indicators(State(state), Path("aapl".to_string()))
            .await
            .unwrap();

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["symbol"], json!("AAPL"));
        assert_eq!(body["data_origin"], json!("store"));
        // 20 rising prices are a real computation, not the default snapshot.
        assert_eq!(body["indicators"]["sma_20"], json!(109.5));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn risk_assessment_produces_tiered_profile() {
        // 20 points meet the minimum, so the real path runs and produces a
        // finite score with a tier string.
        let state = test_state();
        let Json(body) = assess_risk(State(state), Path("AAPL".to_string()))
            .await
            .unwrap();

        assert_eq!(body["success"], json!(true));
        assert!(body["risk_assessment"]["risk_scores"]["overall"].is_number());
        assert!(body["risk_assessment"]["risk_level"].is_string());
    }

    #[tokio::test]
    async fn opportunities_are_sorted_and_thresholded() {
        let state = test_state();
        let Json(body) = find_opportunities(State(state)).await.unwrap();

        assert_eq!(body["success"], json!(true));
        let opportunities = body["opportunities"].as_array().unwrap();
        assert_eq!(body["count"], json!(opportunities.len()));
        let scores: Vec<f64> = opportunities
            .iter()
            .map(|o| o["score"].as_f64().unwrap())
            .collect();
        assert!(scores.iter().all(|&s| s > 60.0));
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn portfolio_with_no_known_symbols_is_not_found() {
        let state = test_state();
        let result = portfolio_analysis(
            State(state),
            Json(vec!["ZZZZ".to_string()]),
        )
        .await;
        assert!(matches!(
            result,
            Err(AppError::Analytics(analytics::AnalyticsError::EmptyPortfolio))
        ));
    }

    #[tokio::test]
    async fn portfolio_analysis_counts_sectors() {
        let state = test_state();
        let Json(body) = portfolio_analysis(
            State(state),
            Json(vec!["aapl".to_string(), "tsla".to_string()]),
        )
        .await
        .unwrap();

        assert_eq!(body["analysis"]["portfolio_stocks"].as_array().unwrap().len(), 2);
        // Two distinct sectors at 20 points each.
        assert_eq!(body["analysis"]["diversification_score"], json!(40));
    }

    #[tokio::test]
    async fn unknown_asset_detail_is_not_found() {
        let state = test_state();
        let result = get_asset(State(state), Path("ZZZZ".to_string())).await;
        assert!(matches!(
            result,
            Err(AppError::Provider(ProviderError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn price_history_honors_days_param() {
        let state = test_state();
        let Json(body) = get_price_history(
            State(state),
            Path("AAPL".to_string()),
            Query(HistoryParams { days: 5 }),
        )
        .await
        .unwrap();

        assert_eq!(body["count"], json!(5));
        assert_eq!(body["data_origin"], json!("store"));
    }
}
