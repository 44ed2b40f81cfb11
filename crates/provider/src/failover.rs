use crate::error::ProviderError;
use crate::{synthetic, MarketDataProvider};
use core_types::{AssetDetail, AssetProfile, AssetQuote, PricePoint};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::warn;

/// Where a piece of served data actually came from.
///
/// Tagging the substitution keeps the fallback honest: a consumer can always
/// tell a real store answer from a synthetic stand-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Store,
    Synthetic,
}

/// Wraps a provider and substitutes synthetic data when the store is
/// unavailable.
///
/// Only `Unavailable` triggers substitution of series and lists; an unknown
/// symbol (`NotFound`) gets the default profile but is never given a fake
/// price history, so short-history defaults downstream still apply.
pub struct FailoverProvider<P> {
    inner: P,
    rng: Mutex<StdRng>,
}

impl<P: MarketDataProvider> FailoverProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// A failover provider whose synthetic data is reproducible. Used by
    /// tests and the demo seed path.
    pub fn with_seed(inner: P, seed: u64) -> Self {
        Self {
            inner,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub async fn price_history(
        &self,
        symbol: &str,
        days: i32,
        daily_sigma: f64,
    ) -> (Vec<f64>, DataOrigin) {
        match self.inner.price_history(symbol, days).await {
            Ok(prices) => (prices, DataOrigin::Store),
            Err(err) => {
                warn!(symbol, error = %err, "price history unavailable, substituting synthetic series");
                let mut rng = self.rng.lock().expect("rng mutex poisoned");
                (
                    synthetic::price_series(symbol, days.max(0) as usize, daily_sigma, &mut *rng),
                    DataOrigin::Synthetic,
                )
            }
        }
    }

    pub async fn asset_profile(&self, symbol: &str) -> (AssetProfile, DataOrigin) {
        match self.inner.asset_profile(symbol).await {
            Ok(profile) => (profile, DataOrigin::Store),
            Err(err) => {
                warn!(symbol, error = %err, "asset profile unavailable, substituting default profile");
                (synthetic::default_profile(symbol), DataOrigin::Synthetic)
            }
        }
    }

    /// Asset detail keeps `NotFound` as an error so the HTTP layer can 404;
    /// only store unavailability falls back.
    pub async fn asset_detail(&self, symbol: &str) -> Result<(AssetDetail, DataOrigin), ProviderError> {
        match self.inner.asset_detail(symbol).await {
            Ok(detail) => Ok((detail, DataOrigin::Store)),
            Err(ProviderError::NotFound(sym)) => Err(ProviderError::NotFound(sym)),
            Err(err) => {
                warn!(symbol, error = %err, "asset detail unavailable, searching fallback quotes");
                synthetic::fallback_quotes()
                    .into_iter()
                    .find(|q| q.symbol == symbol)
                    .map(|q| {
                        let detail = AssetDetail {
                            profile: q.profile(),
                            current_price: q.current_price,
                            change: q.change,
                            change_percent: q.change_percent,
                        };
                        (detail, DataOrigin::Synthetic)
                    })
                    .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
            }
        }
    }

    /// Lists assets, filling any missing latest price from the base-price
    /// table so consumers always see a usable quote.
    pub async fn list_assets(&self) -> (Vec<AssetQuote>, DataOrigin) {
        match self.inner.list_assets().await {
            Ok(quotes) => {
                let filled = quotes
                    .into_iter()
                    .map(|mut q| {
                        if q.current_price.is_none() {
                            q.current_price = Some(synthetic::base_price(&q.symbol));
                            q.change = Some(0.0);
                            q.change_percent = Some(0.0);
                        }
                        q
                    })
                    .collect();
                (filled, DataOrigin::Store)
            }
            Err(err) => {
                warn!(error = %err, "asset list unavailable, substituting fallback quotes");
                (synthetic::fallback_quotes(), DataOrigin::Synthetic)
            }
        }
    }

    pub async fn recent_prices(&self, symbol: &str, limit: i64) -> (Vec<PricePoint>, DataOrigin) {
        match self.inner.recent_prices(symbol, limit).await {
            Ok(rows) => (rows, DataOrigin::Store),
            Err(err) => {
                warn!(symbol, error = %err, "recent prices unavailable, substituting synthetic rows");
                let mut rng = self.rng.lock().expect("rng mutex poisoned");
                (
                    synthetic::recent_prices(symbol, limit.max(0) as usize, &mut *rng),
                    DataOrigin::Synthetic,
                )
            }
        }
    }
}
