//! # Quantview Analytics Library
//!
//! Pure, stateless computation of derived asset analytics: technical
//! indicators, a risk profile, and a heuristic opportunity score.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems and depends only on `core-types` (Layer 0). Callers
//!   pass price history and asset profiles in; nothing is fetched or
//!   persisted here.
//! - **Total Functions:** Every computation is defined over any finite price
//!   series. A series too short for a real calculation yields a documented
//!   default snapshot instead of an error, so the endpoints built on top are
//!   always available.
//! - **Injected Randomness:** The opportunity heuristics are noisy by
//!   design; the noise source is a parameter so production supplies a real
//!   generator and tests supply a silent one.
//!
//! ## Public API
//!
//! - `compute_indicators` / `IndicatorSet`: the technical-indicator snapshot.
//! - `assess_risk` / `RiskProfile`: the risk metrics, tier and narratives.
//! - `score_opportunity`, `analyze_portfolio`: opportunity and portfolio
//!   scoring.
//! - `NoiseSource`, `GaussianNoise`, `NoNoise`: the injectable perturbation.

// Declare the modules that constitute this crate.
pub mod error;
pub mod indicators;
pub mod noise;
pub mod opportunity;
pub mod risk;

// Re-export the key components to create a clean, public-facing API.
pub use error::AnalyticsError;
pub use indicators::{
    compute_indicators, compute_indicators_with_mode, default_indicators, IndicatorSet, MacdMode,
};
pub use noise::{GaussianNoise, NoNoise, NoiseSource};
pub use opportunity::{
    analyze_portfolio, score_opportunity, OpportunityScore, PortfolioAnalysis,
};
pub use risk::{assess_risk, assess_risk_with_rate, default_risk_profile, RiskProfile};
