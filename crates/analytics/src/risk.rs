use core_types::{AssetProfile, RiskTier};
use serde::{Deserialize, Serialize};

/// Assumed trading days per year for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default annual risk-free rate for the reward/risk ratio.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Minimum history length for a real (non-default) risk profile.
pub const MIN_RISK_POINTS: usize = 20;

/// The five numeric risk metrics, in the units the API reports them:
/// volatility, drawdown and VaR as percentages, Sharpe as a plain ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub volatility: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub var_95: f64,
    pub var_99: f64,
}

/// Sub-scores per metric plus their sum. Higher means riskier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScores {
    pub volatility: u32,
    pub max_drawdown: u32,
    pub sharpe_ratio: u32,
    pub overall: u32,
}

/// A computed risk snapshot for one symbol. Ephemeral, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub symbol: String,
    pub company_name: String,
    pub risk_level: RiskTier,
    pub risk_scores: RiskScores,
    pub risk_metrics: RiskMetrics,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub market_cap: i64,
    pub sector: String,
}

const MAX_RISK_FACTORS: usize = 4;
const MAX_RECOMMENDATIONS: usize = 4;

/// Annualized volatility: population standard deviation of period returns
/// times the square root of the trading year. Defaults to 0.25 with fewer
/// than two prices.
pub fn annualized_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.25;
    }
    let returns = period_returns(prices);
    std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Maximum peak-to-trough decline as a fraction of the running peak.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }
    let mut peak = prices[0];
    let mut worst: f64 = 0.0;
    for &price in prices {
        if price > peak {
            peak = price;
        }
        worst = worst.max((peak - price) / peak);
    }
    worst
}

/// Sharpe-style reward/risk ratio against the given risk-free rate.
///
/// Zero when annualized volatility is zero; 1.0 with fewer than two prices.
pub fn sharpe_ratio(prices: &[f64], risk_free_rate: f64) -> f64 {
    if prices.len() < 2 {
        return 1.0;
    }
    let returns = period_returns(prices);
    let annual_return = mean(&returns) * TRADING_DAYS_PER_YEAR;
    let annual_vol = std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt();
    if annual_vol == 0.0 {
        return 0.0;
    }
    (annual_return - risk_free_rate) / annual_vol
}

/// Historical value-at-risk at the given confidence level, annualized and
/// reported as a positive fraction. Defaults to 0.05 with fewer than 30
/// prices.
pub fn value_at_risk(prices: &[f64], confidence_level: f64) -> f64 {
    if prices.len() < 30 {
        return 0.05;
    }
    let returns = period_returns(prices);
    let pct = (1.0 - confidence_level) * 100.0;
    let daily = percentile(&returns, pct);
    (daily * TRADING_DAYS_PER_YEAR.sqrt()).abs()
}

/// Buckets each metric into its sub-score and sums them into the overall
/// score. Inputs are in fraction form (volatility 0.25 = 25%).
pub fn risk_scores(volatility: f64, max_drawdown: f64, sharpe_ratio: f64) -> RiskScores {
    let volatility_score = if volatility < 0.15 {
        10
    } else if volatility < 0.25 {
        20
    } else if volatility < 0.35 {
        30
    } else {
        40
    };

    let drawdown_score = if max_drawdown < 0.10 {
        5
    } else if max_drawdown < 0.20 {
        10
    } else if max_drawdown < 0.35 {
        20
    } else {
        30
    };

    // Lower is better: a strong reward/risk ratio contributes nothing.
    let sharpe_score = if sharpe_ratio > 2.0 {
        0
    } else if sharpe_ratio > 1.5 {
        5
    } else if sharpe_ratio > 1.0 {
        10
    } else if sharpe_ratio > 0.5 {
        20
    } else {
        30
    };

    RiskScores {
        volatility: volatility_score,
        max_drawdown: drawdown_score,
        sharpe_ratio: sharpe_score,
        overall: volatility_score + drawdown_score + sharpe_score,
    }
}

/// Full risk assessment with the default risk-free rate.
pub fn assess_risk(prices: &[f64], profile: &AssetProfile) -> RiskProfile {
    assess_risk_with_rate(prices, profile, DEFAULT_RISK_FREE_RATE)
}

/// Full risk assessment against an explicit risk-free rate.
///
/// Never errors: a series shorter than [`MIN_RISK_POINTS`] yields the fixed
/// default profile.
pub fn assess_risk_with_rate(
    prices: &[f64],
    profile: &AssetProfile,
    risk_free_rate: f64,
) -> RiskProfile {
    if prices.len() < MIN_RISK_POINTS {
        return default_risk_profile(profile);
    }

    let volatility = annualized_volatility(prices);
    let drawdown = max_drawdown(prices);
    let sharpe = sharpe_ratio(prices, risk_free_rate);
    let var_95 = value_at_risk(prices, 0.95);
    let var_99 = value_at_risk(prices, 0.99);

    let scores = risk_scores(volatility, drawdown, sharpe);
    let risk_level = RiskTier::from_score(scores.overall);
    let risk_factors = identify_risk_factors(volatility, drawdown, profile);
    let recommendations = risk_recommendations(risk_level, &risk_factors);

    RiskProfile {
        symbol: profile.symbol.clone(),
        company_name: profile.name.clone(),
        risk_level,
        risk_scores: scores,
        risk_metrics: RiskMetrics {
            volatility: round2(volatility * 100.0),
            max_drawdown: round2(drawdown * 100.0),
            sharpe_ratio: round2(sharpe),
            var_95: round2(var_95 * 100.0),
            var_99: round2(var_99 * 100.0),
        },
        risk_factors,
        recommendations,
        market_cap: profile.market_cap,
        sector: profile.sector.clone(),
    }
}

/// The fixed medium-risk profile for symbols without enough history.
pub fn default_risk_profile(profile: &AssetProfile) -> RiskProfile {
    RiskProfile {
        symbol: profile.symbol.clone(),
        company_name: profile.name.clone(),
        risk_level: RiskTier::Medium,
        risk_scores: RiskScores {
            volatility: 20,
            max_drawdown: 10,
            sharpe_ratio: 15,
            overall: 45,
        },
        risk_metrics: RiskMetrics {
            volatility: 25.0,
            max_drawdown: 15.0,
            sharpe_ratio: 1.2,
            var_95: 5.0,
            var_99: 8.0,
        },
        risk_factors: vec![
            "Limited historical data available".to_string(),
            "Market conditions may change rapidly".to_string(),
        ],
        recommendations: vec![
            "Monitor position regularly".to_string(),
            "Consider diversification".to_string(),
        ],
        market_cap: profile.market_cap,
        sector: profile.sector.clone(),
    }
}

fn identify_risk_factors(volatility: f64, max_drawdown: f64, profile: &AssetProfile) -> Vec<String> {
    let mut factors = Vec::new();

    if volatility > 0.35 {
        factors.push("High price volatility indicates significant market risk".to_string());
    } else if volatility > 0.25 {
        factors.push("Moderate to high volatility may cause large price swings".to_string());
    }

    if max_drawdown > 0.40 {
        factors.push("Historical maximum drawdown suggests high downside risk".to_string());
    } else if max_drawdown > 0.25 {
        factors
            .push("Significant historical drawdown indicates potential for large losses".to_string());
    }

    match profile.sector.as_str() {
        "Technology" => factors
            .push("Technology sector subject to rapid innovation and disruption risks".to_string()),
        "Energy" => factors.push("Energy sector exposed to commodity price volatility".to_string()),
        "Finance" => factors.push(
            "Financial sector sensitive to interest rate changes and regulations".to_string(),
        ),
        _ => {}
    }

    if profile.market_cap < 2_000_000_000 {
        factors.push("Small-cap stock may have liquidity and volatility risks".to_string());
    }

    factors.truncate(MAX_RISK_FACTORS);
    factors
}

fn risk_recommendations(risk_level: RiskTier, risk_factors: &[String]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if risk_level.is_elevated() {
        recommendations.extend([
            "Consider position sizing to limit exposure".to_string(),
            "Use stop-loss orders to manage downside risk".to_string(),
            "Monitor closely for market changes".to_string(),
        ]);
    } else if risk_level == RiskTier::Medium {
        recommendations.extend([
            "Maintain diversified portfolio to reduce concentration risk".to_string(),
            "Regular rebalancing recommended".to_string(),
        ]);
    } else {
        recommendations.extend([
            "Suitable for long-term investment strategies".to_string(),
            "Lower monitoring frequency required".to_string(),
        ]);
    }

    if risk_factors
        .iter()
        .any(|f| f.to_lowercase().contains("volatility"))
    {
        recommendations
            .push("Consider dollar-cost averaging to mitigate volatility impact".to_string());
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn period_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn profile(sector: &str, market_cap: i64) -> AssetProfile {
        AssetProfile {
            symbol: "TEST".to_string(),
            name: "Test Corporation".to_string(),
            sector: sector.to_string(),
            industry: "Testing".to_string(),
            market_cap,
        }
    }

    #[test]
    fn constant_series_has_no_volatility_or_drawdown() {
        let flat = [50.0; 60];
        assert!(annualized_volatility(&flat).abs() < EPS);
        assert!(max_drawdown(&flat).abs() < EPS);
        // Zero volatility short-circuits the ratio.
        assert_eq!(sharpe_ratio(&flat, DEFAULT_RISK_FREE_RATE), 0.0);
    }

    #[test]
    fn short_series_defaults() {
        assert_eq!(annualized_volatility(&[100.0]), 0.25);
        assert_eq!(max_drawdown(&[100.0]), 0.0);
        assert_eq!(sharpe_ratio(&[100.0], DEFAULT_RISK_FREE_RATE), 1.0);
        assert_eq!(value_at_risk(&[100.0; 29], 0.95), 0.05);
    }

    #[test]
    fn drawdown_tracks_running_peak() {
        let prices = [100.0, 120.0, 90.0, 110.0, 95.0];
        // Peak 120, trough 90.
        assert!((max_drawdown(&prices) - 0.25).abs() < EPS);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&values, 50.0) - 2.5).abs() < EPS);
        assert!((percentile(&values, 0.0) - 1.0).abs() < EPS);
        assert!((percentile(&values, 100.0) - 4.0).abs() < EPS);
    }

    #[test]
    fn score_buckets_match_thresholds() {
        let scores = risk_scores(0.10, 0.05, 2.5);
        assert_eq!(scores.volatility, 10);
        assert_eq!(scores.max_drawdown, 5);
        assert_eq!(scores.sharpe_ratio, 0);
        assert_eq!(scores.overall, 15);

        let scores = risk_scores(0.40, 0.40, 0.1);
        assert_eq!(scores.overall, 40 + 30 + 30);
    }

    #[test]
    fn short_history_yields_default_profile() {
        let p = profile("Technology", 1_000_000_000_000);
        let report = assess_risk(&[100.0; 19], &p);
        assert_eq!(report.risk_level, RiskTier::Medium);
        assert_eq!(report.risk_scores.overall, 45);
        assert_eq!(report.risk_metrics.volatility, 25.0);
        assert_eq!(report.risk_factors.len(), 2);
    }

    #[test]
    fn factors_reflect_sector_and_market_cap() {
        let p = profile("Energy", 1_000_000_000);
        let factors = identify_risk_factors(0.40, 0.45, &p);
        assert_eq!(factors.len(), 4);
        assert!(factors[0].contains("High price volatility"));
        assert!(factors.iter().any(|f| f.contains("Energy sector")));
        assert!(factors.iter().any(|f| f.contains("Small-cap")));
    }

    #[test]
    fn volatility_factor_triggers_averaging_recommendation() {
        let factors = vec!["High price volatility indicates significant market risk".to_string()];
        let recs = risk_recommendations(RiskTier::VeryHigh, &factors);
        assert_eq!(recs.len(), 4);
        assert!(recs[3].contains("dollar-cost averaging"));
    }

    #[test]
    fn low_tier_recommendations() {
        let recs = risk_recommendations(RiskTier::VeryLow, &[]);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("long-term"));
    }

    #[test]
    fn assessed_profile_carries_metadata() {
        let p = profile("Finance", 50_000_000_000);
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 4.0).collect();
        let report = assess_risk(&prices, &p);
        assert_eq!(report.symbol, "TEST");
        assert_eq!(report.sector, "Finance");
        assert_eq!(
            report.risk_scores.overall,
            report.risk_scores.volatility
                + report.risk_scores.max_drawdown
                + report.risk_scores.sharpe_ratio
        );
        assert_eq!(report.risk_level, RiskTier::from_score(report.risk_scores.overall));
    }
}
