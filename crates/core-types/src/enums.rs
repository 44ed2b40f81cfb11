use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative risk tier derived from the overall risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskTier {
    /// Maps an overall risk score (0-100, higher is riskier) to its tier.
    pub fn from_score(score: u32) -> Self {
        if score < 20 {
            RiskTier::VeryLow
        } else if score < 35 {
            RiskTier::Low
        } else if score < 50 {
            RiskTier::Medium
        } else if score < 70 {
            RiskTier::High
        } else {
            RiskTier::VeryHigh
        }
    }

    /// Whether this tier calls for active risk management.
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskTier::High | RiskTier::VeryHigh)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskTier::VeryLow => "Very Low",
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
            RiskTier::VeryHigh => "Very High",
        };
        write!(f, "{}", label)
    }
}

/// Discrete investment grade derived from the overall opportunity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    #[serde(rename = "Moderate Buy")]
    ModerateBuy,
    Hold,
    #[serde(rename = "Moderate Sell")]
    ModerateSell,
    Sell,
}

impl Grade {
    /// Maps an overall opportunity score (0-100, higher is better) to a grade.
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Grade::StrongBuy
        } else if score >= 75.0 {
            Grade::Buy
        } else if score >= 65.0 {
            Grade::ModerateBuy
        } else if score >= 55.0 {
            Grade::Hold
        } else if score >= 45.0 {
            Grade::ModerateSell
        } else {
            Grade::Sell
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::StrongBuy => "Strong Buy",
            Grade::Buy => "Buy",
            Grade::ModerateBuy => "Moderate Buy",
            Grade::Hold => "Hold",
            Grade::ModerateSell => "Moderate Sell",
            Grade::Sell => "Sell",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_tier_boundaries() {
        assert_eq!(RiskTier::from_score(19), RiskTier::VeryLow);
        assert_eq!(RiskTier::from_score(20), RiskTier::Low);
        assert_eq!(RiskTier::from_score(34), RiskTier::Low);
        assert_eq!(RiskTier::from_score(35), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(49), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(50), RiskTier::High);
        assert_eq!(RiskTier::from_score(69), RiskTier::High);
        assert_eq!(RiskTier::from_score(70), RiskTier::VeryHigh);
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_score(85.0), Grade::StrongBuy);
        assert_eq!(Grade::from_score(84.99), Grade::Buy);
        assert_eq!(Grade::from_score(75.0), Grade::Buy);
        assert_eq!(Grade::from_score(65.0), Grade::ModerateBuy);
        assert_eq!(Grade::from_score(55.0), Grade::Hold);
        assert_eq!(Grade::from_score(45.0), Grade::ModerateSell);
        assert_eq!(Grade::from_score(44.99), Grade::Sell);
    }

    #[test]
    fn serialized_labels_match_wire_format() {
        assert_eq!(
            serde_json::to_string(&RiskTier::VeryHigh).unwrap(),
            "\"Very High\""
        );
        assert_eq!(
            serde_json::to_string(&Grade::StrongBuy).unwrap(),
            "\"Strong Buy\""
        );
    }
}
