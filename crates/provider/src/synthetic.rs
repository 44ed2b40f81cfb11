//! Synthetic market data for when the store cannot answer.
//!
//! The generated series are plausible random walks seeded from a per-symbol
//! base price, so downstream analytics always have something to chew on.
//! Everything here takes the generator as a parameter; callers own seeding.

use chrono::{Duration, NaiveDate, Utc};
use core_types::{AssetProfile, AssetQuote, PricePoint};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Daily change standard deviation for indicator-length histories.
pub const INDICATOR_SIGMA: f64 = 0.02;

/// Daily change standard deviation for risk histories (a touch wider so the
/// risk metrics see realistic swings).
pub const RISK_SIGMA: f64 = 0.025;

/// Base price used when the symbol is not in the fixed table.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// The fixed base-price table for well-known demo symbols.
pub fn base_price(symbol: &str) -> f64 {
    match symbol {
        "AAPL" => 150.0,
        "MSFT" => 320.0,
        "GOOGL" => 140.0,
        "TSLA" => 240.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

/// Generates a `days`-long random-walk closing-price series for the symbol,
/// oldest first.
pub fn price_series<R: Rng>(symbol: &str, days: usize, daily_sigma: f64, rng: &mut R) -> Vec<f64> {
    let normal = Normal::new(0.0, daily_sigma).expect("sigma is a positive constant");
    let mut price = base_price(symbol);
    let mut prices = Vec::with_capacity(days);

    for _ in 0..days {
        let change: f64 = normal.sample(rng);
        price *= 1.0 + change;
        prices.push(price);
    }

    prices
}

/// Generates recent price rows (newest first) in the shape of the raw
/// history endpoint.
pub fn recent_prices<R: Rng>(symbol: &str, limit: usize, rng: &mut R) -> Vec<PricePoint> {
    let closes = price_series(symbol, limit, INDICATOR_SIGMA, rng);
    let today = Utc::now().date_naive();

    closes
        .into_iter()
        .rev()
        .enumerate()
        .map(|(i, close_price)| PricePoint {
            date: today - Duration::days(i as i64),
            close_price,
            volume: rng.gen_range(1_000_000..5_000_000),
        })
        .collect()
}

/// The stand-in profile for a symbol the store does not know.
pub fn default_profile(symbol: &str) -> AssetProfile {
    AssetProfile {
        symbol: symbol.to_uppercase(),
        name: format!("{} Corporation", symbol.to_uppercase()),
        sector: "Technology".to_string(),
        industry: "Software".to_string(),
        market_cap: 1_000_000_000_000,
    }
}

/// The fixed quote list substituted when the store cannot list assets.
pub fn fallback_quotes() -> Vec<AssetQuote> {
    vec![
        quote(
            "AAPL",
            "Apple Inc.",
            "Technology",
            "Consumer Electronics",
            3_000_000_000_000,
            150.25,
            2.50,
            1.69,
        ),
        quote(
            "MSFT",
            "Microsoft Corporation",
            "Technology",
            "Software",
            2_800_000_000_000,
            320.80,
            -1.20,
            -0.37,
        ),
        quote(
            "GOOGL",
            "Alphabet Inc.",
            "Technology",
            "Internet Services",
            1_800_000_000_000,
            140.50,
            3.20,
            2.33,
        ),
        quote(
            "TSLA",
            "Tesla Inc.",
            "Consumer Cyclical",
            "Auto Manufacturers",
            800_000_000_000,
            240.80,
            -5.60,
            -2.27,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn quote(
    symbol: &str,
    name: &str,
    sector: &str,
    industry: &str,
    market_cap: i64,
    price: f64,
    change: f64,
    change_percent: f64,
) -> AssetQuote {
    AssetQuote {
        symbol: symbol.to_string(),
        name: name.to_string(),
        sector: sector.to_string(),
        industry: industry.to_string(),
        market_cap,
        current_price: Some(price),
        change: Some(change),
        change_percent: Some(change_percent),
    }
}
