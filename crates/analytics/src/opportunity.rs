use crate::error::AnalyticsError;
use crate::noise::NoiseSource;
use core_types::{AssetProfile, Grade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The four factor sub-scores, each clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub valuation: f64,
    pub momentum: f64,
    pub quality: f64,
    pub growth: f64,
}

/// A computed opportunity snapshot for one asset. Ephemeral, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityScore {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub current_price: f64,
    pub target_price: f64,
    /// Implied return of the target price over the current price, percent.
    pub potential_return: f64,
    pub score: f64,
    pub grade: Grade,
    pub scores: SubScores,
    pub market_cap: i64,
    pub reasons: Vec<String>,
}

/// Portfolio-level aggregation of per-asset opportunity scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub portfolio_stocks: Vec<OpportunityScore>,
    pub total_value: f64,
    pub average_score: f64,
    pub high_quality_holdings: usize,
    pub diversification_score: u32,
    pub sectors: Vec<String>,
    pub recommendation: String,
}

const VALUATION_WEIGHT: f64 = 0.30;
const MOMENTUM_WEIGHT: f64 = 0.25;
const QUALITY_WEIGHT: f64 = 0.25;
const GROWTH_WEIGHT: f64 = 0.20;

/// Opportunity scores above this make a holding "high quality".
pub const HIGH_QUALITY_THRESHOLD: f64 = 75.0;

const MAX_REASONS: usize = 3;

/// Scores one asset. The noise source supplies the bounded random
/// perturbation each sub-score carries; pass [`crate::noise::NoNoise`] for
/// the deterministic base scores.
pub fn score_opportunity(
    profile: &AssetProfile,
    current_price: f64,
    noise: &mut dyn NoiseSource,
) -> OpportunityScore {
    let scores = SubScores {
        valuation: valuation_score(profile, noise),
        momentum: momentum_score(&profile.symbol, noise),
        quality: quality_score(profile, noise),
        growth: growth_score(profile, noise),
    };

    let total = scores.valuation * VALUATION_WEIGHT
        + scores.momentum * MOMENTUM_WEIGHT
        + scores.quality * QUALITY_WEIGHT
        + scores.growth * GROWTH_WEIGHT;
    let score = round2(total);

    let target = target_price(current_price, score);
    let potential_return = if current_price > 0.0 {
        (target - current_price) / current_price * 100.0
    } else {
        0.0
    };

    OpportunityScore {
        symbol: profile.symbol.clone(),
        name: profile.name.clone(),
        sector: profile.sector.clone(),
        current_price,
        target_price: target,
        potential_return,
        score,
        grade: Grade::from_score(score),
        scores,
        market_cap: profile.market_cap,
        reasons: investment_reasons(score, profile),
    }
}

/// Valuation sub-score: market-cap bucket base, sector adjustment, noise.
pub fn valuation_score(profile: &AssetProfile, noise: &mut dyn NoiseSource) -> f64 {
    let base: f64 = if profile.market_cap > 2_000_000_000_000 {
        70.0
    } else if profile.market_cap > 500_000_000_000 {
        80.0
    } else {
        60.0
    };

    let adjustment: f64 = match profile.sector.as_str() {
        "Technology" => 5.0,
        "Healthcare" => 3.0,
        "Finance" => 2.0,
        "Consumer Cyclical" => 0.0,
        "Energy" => -2.0,
        _ => 0.0,
    };

    clamp_score(base + adjustment + noise.sample(10.0))
}

/// Momentum sub-score: stepped from a recent 5-day change. A handful of
/// symbols carry a fixed change; everything else draws one from the noise
/// source.
pub fn momentum_score(symbol: &str, noise: &mut dyn NoiseSource) -> f64 {
    let change_5d = match symbol {
        "AAPL" => 2.5,
        "MSFT" => -1.2,
        "GOOGL" => 3.2,
        "TSLA" => -5.6,
        _ => noise.sample(3.0),
    };

    if change_5d > 5.0 {
        90.0
    } else if change_5d > 2.0 {
        80.0
    } else if change_5d > 0.0 {
        70.0
    } else if change_5d > -2.0 {
        60.0
    } else if change_5d > -5.0 {
        40.0
    } else {
        30.0
    }
}

/// Quality sub-score: sector base plus a large-cap stability bonus.
pub fn quality_score(profile: &AssetProfile, noise: &mut dyn NoiseSource) -> f64 {
    let mut base: f64 = match profile.sector.as_str() {
        "Technology" => 85.0,
        "Healthcare" => 90.0,
        "Finance" => 75.0,
        "Consumer Cyclical" => 70.0,
        "Energy" => 65.0,
        _ => 70.0,
    };

    if profile.market_cap > 1_000_000_000_000 {
        base += 10.0;
    }

    clamp_score(base + noise.sample(8.0))
}

/// Growth sub-score: sector base only.
pub fn growth_score(profile: &AssetProfile, noise: &mut dyn NoiseSource) -> f64 {
    let base: f64 = match profile.sector.as_str() {
        "Technology" => 90.0,
        "Healthcare" => 85.0,
        "Finance" => 70.0,
        "Consumer Cyclical" => 75.0,
        "Energy" => 60.0,
        _ => 70.0,
    };

    clamp_score(base + noise.sample(12.0))
}

/// Expected return as a step function of the overall score.
pub fn expected_return(score: f64) -> f64 {
    if score >= 85.0 {
        0.20
    } else if score >= 75.0 {
        0.15
    } else if score >= 65.0 {
        0.10
    } else if score >= 55.0 {
        0.05
    } else {
        -0.05
    }
}

/// Target price implied by the expected-return step.
pub fn target_price(current_price: f64, score: f64) -> f64 {
    current_price * (1.0 + expected_return(score))
}

fn investment_reasons(score: f64, profile: &AssetProfile) -> Vec<String> {
    let mut reasons = Vec::new();

    if score >= 75.0 {
        reasons.extend([
            format!("{} sector showing strong momentum", profile.sector),
            "Technical indicators suggest upside potential".to_string(),
            "Strong fundamentals relative to peers".to_string(),
        ]);
    } else if score >= 60.0 {
        reasons.extend([
            "Reasonable valuation with growth potential".to_string(),
            "Positive technical trend".to_string(),
        ]);
    } else {
        reasons.extend([
            "High volatility expected".to_string(),
            "Better opportunities may exist elsewhere".to_string(),
        ]);
    }

    if profile.market_cap > 2_000_000_000_000 {
        reasons.push("Large-cap stability provides downside protection".to_string());
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

/// Scores every holding and aggregates portfolio-level quality and
/// diversification. Errors when no assets are supplied.
pub fn analyze_portfolio(
    assets: &[(AssetProfile, f64)],
    noise: &mut dyn NoiseSource,
) -> Result<PortfolioAnalysis, AnalyticsError> {
    if assets.is_empty() {
        return Err(AnalyticsError::EmptyPortfolio);
    }

    let total_value = assets.iter().map(|(_, price)| price).sum();
    let portfolio_stocks: Vec<OpportunityScore> = assets
        .iter()
        .map(|(profile, price)| score_opportunity(profile, *price, noise))
        .collect();

    let average_score = round2(
        portfolio_stocks.iter().map(|o| o.score).sum::<f64>() / portfolio_stocks.len() as f64,
    );
    let high_quality_holdings = portfolio_stocks
        .iter()
        .filter(|o| o.score >= HIGH_QUALITY_THRESHOLD)
        .count();

    let sectors: Vec<String> = assets
        .iter()
        .map(|(profile, _)| profile.sector.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let diversification_score = (sectors.len() as u32 * 20).min(100);

    let recommendation =
        portfolio_recommendation(average_score, diversification_score).to_string();

    Ok(PortfolioAnalysis {
        portfolio_stocks,
        total_value,
        average_score,
        high_quality_holdings,
        diversification_score,
        sectors,
        recommendation,
    })
}

fn portfolio_recommendation(average_score: f64, diversification_score: u32) -> &'static str {
    if average_score >= 80.0 && diversification_score >= 60 {
        "Excellent portfolio with strong fundamentals and good diversification"
    } else if average_score >= 70.0 {
        "Good portfolio quality, consider adding more diversified positions"
    } else if average_score >= 60.0 {
        "Moderate portfolio, review underperforming positions"
    } else {
        "Portfolio needs rebalancing, consider reducing weaker positions"
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{GaussianNoise, NoNoise};

    const EPS: f64 = 1e-9;

    fn profile(symbol: &str, sector: &str, market_cap: i64) -> AssetProfile {
        AssetProfile {
            symbol: symbol.to_string(),
            name: format!("{} Corporation", symbol),
            sector: sector.to_string(),
            industry: "Testing".to_string(),
            market_cap,
        }
    }

    #[test]
    fn base_scores_are_deterministic_without_noise() {
        let p = profile("AAPL", "Technology", 3_000_000_000_000);
        let mut noise = NoNoise;

        // Mega-cap technology: 70 base + 5 sector adjustment.
        assert!((valuation_score(&p, &mut noise) - 75.0).abs() < EPS);
        // Fixed 2.5% five-day change steps to 80.
        assert!((momentum_score("AAPL", &mut noise) - 80.0).abs() < EPS);
        // 85 sector base + 10 large-cap bonus.
        assert!((quality_score(&p, &mut noise) - 95.0).abs() < EPS);
        assert!((growth_score(&p, &mut noise) - 90.0).abs() < EPS);

        let a = score_opportunity(&p, 150.0, &mut noise);
        let b = score_opportunity(&p, 150.0, &mut noise);
        assert_eq!(a, b);
    }

    #[test]
    fn weighted_overall_and_grade() {
        let p = profile("AAPL", "Technology", 3_000_000_000_000);
        let opp = score_opportunity(&p, 150.0, &mut NoNoise);

        // 0.30*75 + 0.25*80 + 0.25*95 + 0.20*90 = 84.25
        assert!((opp.score - 84.25).abs() < EPS);
        assert_eq!(opp.grade, Grade::Buy);
        // Score in [75, 85) implies a 15% expected return.
        assert!((opp.target_price - 150.0 * 1.15).abs() < EPS);
        assert!((opp.potential_return - 15.0).abs() < EPS);
        assert_eq!(opp.reasons.len(), 3);
    }

    #[test]
    fn unknown_symbol_momentum_is_neutral_without_noise() {
        // Zero change falls in the (-2, 0] step.
        assert!((momentum_score("ZZZZ", &mut NoNoise) - 60.0).abs() < EPS);
    }

    #[test]
    fn scores_clamp_to_range() {
        struct Loud(f64);
        impl NoiseSource for Loud {
            fn sample(&mut self, _std_dev: f64) -> f64 {
                self.0
            }
        }

        let p = profile("X", "Healthcare", 2_000_000_000_000);
        assert_eq!(quality_score(&p, &mut Loud(500.0)), 100.0);
        assert_eq!(quality_score(&p, &mut Loud(-500.0)), 0.0);
    }

    #[test]
    fn seeded_scoring_is_reproducible() {
        let p = profile("ZZZZ", "Utilities", 10_000_000_000);
        let a = score_opportunity(&p, 42.0, &mut GaussianNoise::seeded(99));
        let b = score_opportunity(&p, 42.0, &mut GaussianNoise::seeded(99));
        assert_eq!(a, b);
    }

    #[test]
    fn negative_expected_return_below_hold() {
        assert!((expected_return(54.9) + 0.05).abs() < EPS);
        assert!((target_price(100.0, 40.0) - 95.0).abs() < EPS);
    }

    #[test]
    fn empty_portfolio_is_an_error() {
        assert!(matches!(
            analyze_portfolio(&[], &mut NoNoise),
            Err(AnalyticsError::EmptyPortfolio)
        ));
    }

    #[test]
    fn portfolio_aggregation() {
        let assets = vec![
            (profile("AAPL", "Technology", 3_000_000_000_000), 150.25),
            (profile("JNJ", "Healthcare", 400_000_000_000), 160.0),
            (profile("XOM", "Energy", 450_000_000_000), 110.0),
        ];
        let analysis = analyze_portfolio(&assets, &mut NoNoise).unwrap();

        assert_eq!(analysis.portfolio_stocks.len(), 3);
        assert!((analysis.total_value - 420.25).abs() < EPS);
        // Three distinct sectors.
        assert_eq!(analysis.diversification_score, 60);
        assert_eq!(
            analysis.sectors,
            vec!["Energy".to_string(), "Healthcare".to_string(), "Technology".to_string()]
        );
        assert!(!analysis.recommendation.is_empty());
    }

    #[test]
    fn diversification_score_caps_at_100() {
        let assets: Vec<(AssetProfile, f64)> = (0..7)
            .map(|i| (profile(&format!("S{}", i), &format!("Sector{}", i), 1_000), 10.0))
            .collect();
        let analysis = analyze_portfolio(&assets, &mut NoNoise).unwrap();
        assert_eq!(analysis.diversification_score, 100);
    }
}
