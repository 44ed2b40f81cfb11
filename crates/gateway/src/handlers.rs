use crate::{error::GatewayError, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// # GET /
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "quantview-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// # GET /api/health
/// The gateway's own health, including whether the analytics service is
/// reachable. The probe itself never fails.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let analytics_service = match state.api.health().await {
        Ok(_) => "reachable",
        Err(_) => "unreachable",
    };

    Json(json!({
        "status": "healthy",
        "analytics_service": analytics_service,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// # POST /api/technical-indicators/:symbol
pub async fn technical_indicators(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    let body = state.api.technical_indicators(&symbol.to_uppercase()).await?;
    Ok(Json(body))
}

/// # POST /api/assess-risk/:symbol
pub async fn assess_risk(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    let body = state.api.assess_risk(&symbol.to_uppercase()).await?;
    Ok(Json(body))
}

/// # POST /api/find-opportunities
pub async fn find_opportunities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, GatewayError> {
    let body = state.api.find_opportunities().await?;
    Ok(Json(body))
}

/// # POST /api/portfolio-analysis
pub async fn portfolio_analysis(
    State(state): State<Arc<AppState>>,
    Json(symbols): Json<Vec<String>>,
) -> Result<Json<Value>, GatewayError> {
    let symbols: Vec<String> = symbols.iter().map(|s| s.to_uppercase()).collect();
    let body = state.api.portfolio_analysis(&symbols).await?;
    Ok(Json(body))
}

/// # POST /api/comprehensive-analysis/:symbol
/// Fans out to the three analytics endpoints concurrently and merges the
/// answers. A failed branch becomes `null` instead of failing the whole
/// response.
pub async fn comprehensive_analysis(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    let symbol = symbol.to_uppercase();

    let (indicators, risk, opportunities) = tokio::join!(
        state.api.technical_indicators(&symbol),
        state.api.assess_risk(&symbol),
        state.api.find_opportunities(),
    );

    Ok(Json(json!({
        "success": true,
        "symbol": symbol,
        "technical_indicators": section(indicators, "indicators"),
        "risk_assessment": section(risk, "risk_assessment"),
        "opportunities": section(opportunities, "opportunities"),
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// Pulls one payload key out of an upstream envelope, or `null` when that
/// branch failed.
fn section(result: Result<Value, GatewayError>, key: &str) -> Value {
    match result {
        Ok(mut envelope) => envelope[key].take(),
        Err(err) => {
            tracing::warn!(error = %err, key, "Analysis branch failed; returning null.");
            Value::Null
        }
    }
}

/// # GET /api/assets
pub async fn get_assets(State(state): State<Arc<AppState>>) -> Result<Json<Value>, GatewayError> {
    let body = state.api.list_assets().await?;
    Ok(Json(body))
}

/// # GET /api/assets/:symbol
pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, GatewayError> {
    let body = state.api.asset_detail(&symbol.to_uppercase()).await?;
    Ok(Json(body))
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
) -> Result<Json<Value>, GatewayError> {
    let body = state
        .api
        .price_history(&symbol.to_uppercase(), params.days)
        .await?;
    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AnalyticsApi;
    use async_trait::async_trait;

    /// A fake analytics service that records nothing and answers canned
    /// envelopes, with one branch optionally failing.
    struct FakeApi {
        risk_fails: bool,
    }

    #[async_trait]
    impl AnalyticsApi for FakeApi {
        async fn health(&self) -> Result<Value, GatewayError> {
            Ok(json!({"status": "healthy"}))
        }

        async fn technical_indicators(&self, symbol: &str) -> Result<Value, GatewayError> {
            Ok(json!({"success": true, "symbol": symbol, "indicators": {"rsi": 50.0}}))
        }

        async fn assess_risk(&self, symbol: &str) -> Result<Value, GatewayError> {
            if self.risk_fails {
                Err(GatewayError::Upstream { status: 500 })
            } else {
                Ok(json!({"success": true, "symbol": symbol, "risk_assessment": {"risk_level": "Medium"}}))
            }
        }

        async fn find_opportunities(&self) -> Result<Value, GatewayError> {
            Ok(json!({"success": true, "opportunities": [], "count": 0}))
        }

        async fn portfolio_analysis(&self, symbols: &[String]) -> Result<Value, GatewayError> {
            Ok(json!({"success": true, "portfolio": symbols}))
        }

        async fn list_assets(&self) -> Result<Value, GatewayError> {
            Ok(json!({"success": true, "assets": [], "count": 0}))
        }

        async fn asset_detail(&self, symbol: &str) -> Result<Value, GatewayError> {
            Ok(json!({"success": true, "asset": {"symbol": symbol}}))
        }

        async fn price_history(&self, symbol: &str, days: i64) -> Result<Value, GatewayError> {
            Ok(json!({"success": true, "symbol": symbol, "count": days}))
        }
    }

    fn test_state(risk_fails: bool) -> Arc<AppState> {
        Arc::new(AppState {
            api: Box::new(FakeApi { risk_fails }),
        })
    }

    #[tokio::test]
    async fn proxied_symbol_is_uppercased() {
        let state = test_state(false);
        let Json(body) = technical_indicators(State(state), Path("aapl".to_string()))
            .await
            .unwrap();
        assert_eq!(body["symbol"], json!("AAPL"));
    }

    #[tokio::test]
    async fn comprehensive_analysis_merges_all_branches() {
        let state = test_state(false);
        let Json(body) = comprehensive_analysis(State(state), Path("msft".to_string()))
            .await
            .unwrap();

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["symbol"], json!("MSFT"));
        assert_eq!(body["technical_indicators"]["rsi"], json!(50.0));
        assert_eq!(body["risk_assessment"]["risk_level"], json!("Medium"));
        assert!(body["opportunities"].is_array());
    }

    #[tokio::test]
    async fn failed_branch_becomes_null() {
        let state = test_state(true);
        let Json(body) = comprehensive_analysis(State(state), Path("MSFT".to_string()))
            .await
            .unwrap();

        assert_eq!(body["success"], json!(true));
        assert!(body["risk_assessment"].is_null());
        // The surviving branches are unaffected.
        assert_eq!(body["technical_indicators"]["rsi"], json!(50.0));
    }

    #[tokio::test]
    async fn health_reports_upstream_reachability() {
        let state = test_state(false);
        let Json(body) = health(State(state)).await;
        assert_eq!(body["analytics_service"], json!("reachable"));
    }
}
