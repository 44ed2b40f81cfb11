use crate::error::GatewayError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// The generic, abstract interface to the analytics service.
///
/// This trait is the contract the gateway handlers use, allowing the
/// underlying implementation (HTTP or a test fake) to be swapped out.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    async fn health(&self) -> Result<Value, GatewayError>;
    async fn technical_indicators(&self, symbol: &str) -> Result<Value, GatewayError>;
    async fn assess_risk(&self, symbol: &str) -> Result<Value, GatewayError>;
    async fn find_opportunities(&self) -> Result<Value, GatewayError>;
    async fn portfolio_analysis(&self, symbols: &[String]) -> Result<Value, GatewayError>;
    async fn list_assets(&self) -> Result<Value, GatewayError>;
    async fn asset_detail(&self, symbol: &str) -> Result<Value, GatewayError>;
    async fn price_history(&self, symbol: &str, days: i64) -> Result<Value, GatewayError>;
}

/// A concrete implementation of [`AnalyticsApi`] over HTTP.
#[derive(Clone)]
pub struct HttpAnalyticsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAnalyticsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build reqwest client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn request(&self, builder: reqwest::RequestBuilder) -> Result<Value, GatewayError> {
        let response = builder
            .send()
            .await
            .map_err(|err| GatewayError::Unreachable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|err| GatewayError::InvalidResponse(err.to_string()))
    }

    async fn get(&self, path: &str) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        self.request(self.client.get(&url)).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.post(&url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.request(builder).await
    }
}

#[async_trait]
impl AnalyticsApi for HttpAnalyticsClient {
    async fn health(&self) -> Result<Value, GatewayError> {
        self.get("/health").await
    }

    async fn technical_indicators(&self, symbol: &str) -> Result<Value, GatewayError> {
        self.post(&format!("/api/technical-indicators/{}", symbol), None)
            .await
    }

    async fn assess_risk(&self, symbol: &str) -> Result<Value, GatewayError> {
        self.post(&format!("/api/assess-risk/{}", symbol), None).await
    }

    async fn find_opportunities(&self) -> Result<Value, GatewayError> {
        self.post("/api/find-opportunities", None).await
    }

    async fn portfolio_analysis(&self, symbols: &[String]) -> Result<Value, GatewayError> {
        let body = serde_json::to_value(symbols)
            .map_err(|err| GatewayError::InvalidResponse(err.to_string()))?;
        self.post("/api/portfolio-analysis", Some(&body)).await
    }

    async fn list_assets(&self) -> Result<Value, GatewayError> {
        self.get("/api/assets").await
    }

    async fn asset_detail(&self, symbol: &str) -> Result<Value, GatewayError> {
        self.get(&format!("/api/assets/{}", symbol)).await
    }

    async fn price_history(&self, symbol: &str, days: i64) -> Result<Value, GatewayError> {
        self.get(&format!("/api/assets/{}/price-history?days={}", symbol, days))
            .await
    }
}
