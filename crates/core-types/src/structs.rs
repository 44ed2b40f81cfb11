use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Static descriptive attributes of a tradable asset.
///
/// The symbol is the immutable key; the sector is an open string set.
/// Profiles are supplied by the data provider and are read-only to the
/// analytics library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    /// Market capitalization in whole dollars. Never negative.
    pub market_cap: i64,
}

impl AssetProfile {
    /// Builds a validated profile. The symbol is normalized to uppercase.
    pub fn new(
        symbol: &str,
        name: &str,
        sector: &str,
        industry: &str,
        market_cap: i64,
    ) -> Result<Self, CoreError> {
        if symbol.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "must not be empty".to_string(),
            ));
        }
        if market_cap < 0 {
            return Err(CoreError::InvalidInput(
                "market_cap".to_string(),
                format!("must be non-negative, got {}", market_cap),
            ));
        }
        Ok(Self {
            symbol: symbol.trim().to_uppercase(),
            name: name.to_string(),
            sector: sector.to_string(),
            industry: industry.to_string(),
            market_cap,
        })
    }
}

/// An asset row joined with its latest quote, as served by the list endpoint.
///
/// Price fields are `None` when the store has no price row for the symbol;
/// the provider layer decides how to fill the gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub market_cap: i64,
    pub current_price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}

impl AssetQuote {
    pub fn profile(&self) -> AssetProfile {
        AssetProfile {
            symbol: self.symbol.clone(),
            name: self.name.clone(),
            sector: self.sector.clone(),
            industry: self.industry.clone(),
            market_cap: self.market_cap,
        }
    }
}

/// Full single-asset detail: the profile plus the latest quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub profile: AssetProfile,
    pub current_price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}

/// One closing-price observation in a symbol's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close_price: f64,
    pub volume: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_normalizes_symbol() {
        let profile = AssetProfile::new("aapl ", "Apple Inc.", "Technology", "Hardware", 1).unwrap();
        assert_eq!(profile.symbol, "AAPL");
    }

    #[test]
    fn profile_rejects_bad_input() {
        assert!(AssetProfile::new("  ", "x", "y", "z", 0).is_err());
        assert!(AssetProfile::new("AAPL", "x", "y", "z", -1).is_err());
    }
}
