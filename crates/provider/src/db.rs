use crate::error::ProviderError;
use crate::MarketDataProvider;
use async_trait::async_trait;
use core_types::{AssetDetail, AssetProfile, AssetQuote, PricePoint};
use database::MarketRepository;

/// The store-backed provider: a thin translation from repository rows to the
/// provider contract. No fallback logic lives here; failures surface as
/// typed `ProviderError`s for the failover layer to interpret.
#[derive(Debug, Clone)]
pub struct DbProvider {
    repo: MarketRepository,
}

impl DbProvider {
    pub fn new(repo: MarketRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl MarketDataProvider for DbProvider {
    async fn price_history(&self, symbol: &str, days: i32) -> Result<Vec<f64>, ProviderError> {
        Ok(self.repo.price_history(symbol, days).await?)
    }

    async fn asset_profile(&self, symbol: &str) -> Result<AssetProfile, ProviderError> {
        self.repo
            .get_asset(symbol)
            .await?
            .map(|detail| detail.profile)
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
    }

    async fn asset_detail(&self, symbol: &str) -> Result<AssetDetail, ProviderError> {
        self.repo
            .get_asset(symbol)
            .await?
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
    }

    async fn list_assets(&self) -> Result<Vec<AssetQuote>, ProviderError> {
        Ok(self.repo.list_assets().await?)
    }

    async fn recent_prices(&self, symbol: &str, limit: i64) -> Result<Vec<PricePoint>, ProviderError> {
        Ok(self.repo.recent_prices(symbol, limit).await?)
    }
}
