//! # Quantview Provider Crate
//!
//! The price/profile provider seam between storage and analytics. The
//! analytics service asks this crate for data; whether that data comes from
//! the store or from a synthetic fallback is decided here, in one place,
//! with the substitution tagged rather than silent.

use async_trait::async_trait;
use core_types::{AssetDetail, AssetProfile, AssetQuote, PricePoint};

pub mod db;
pub mod error;
pub mod failover;
pub mod synthetic;

// --- Public API ---
pub use db::DbProvider;
pub use error::ProviderError;
pub use failover::{DataOrigin, FailoverProvider};

/// The generic, abstract interface for a market-data source.
///
/// This trait is the contract the services program against, allowing the
/// underlying implementation (store-backed or a test fake) to be swapped
/// out.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// The trailing `days` of closing prices for one symbol, oldest first.
    /// May legitimately be empty or short.
    async fn price_history(&self, symbol: &str, days: i32) -> Result<Vec<f64>, ProviderError>;

    /// The static profile for a symbol.
    async fn asset_profile(&self, symbol: &str) -> Result<AssetProfile, ProviderError>;

    /// The profile plus latest quote for a symbol.
    async fn asset_detail(&self, symbol: &str) -> Result<AssetDetail, ProviderError>;

    /// Every known asset with its latest quote.
    async fn list_assets(&self) -> Result<Vec<AssetQuote>, ProviderError>;

    /// The most recent raw price rows, newest first.
    async fn recent_prices(&self, symbol: &str, limit: i64) -> Result<Vec<PricePoint>, ProviderError>;
}

// Allow services to hold a boxed provider behind the same trait.
#[async_trait]
impl<T: MarketDataProvider + ?Sized> MarketDataProvider for Box<T> {
    async fn price_history(&self, symbol: &str, days: i32) -> Result<Vec<f64>, ProviderError> {
        (**self).price_history(symbol, days).await
    }

    async fn asset_profile(&self, symbol: &str) -> Result<AssetProfile, ProviderError> {
        (**self).asset_profile(symbol).await
    }

    async fn asset_detail(&self, symbol: &str) -> Result<AssetDetail, ProviderError> {
        (**self).asset_detail(symbol).await
    }

    async fn list_assets(&self) -> Result<Vec<AssetQuote>, ProviderError> {
        (**self).list_assets().await
    }

    async fn recent_prices(&self, symbol: &str, limit: i64) -> Result<Vec<PricePoint>, ProviderError> {
        (**self).recent_prices(symbol, limit).await
    }
}
