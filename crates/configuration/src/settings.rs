use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gateway: GatewaySettings,
    pub analytics: AnalyticsSettings,
    pub risk: RiskSettings,
    pub seed: SeedSettings,
}

/// Settings for the public-facing gateway service.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    /// The address the gateway listens on (e.g., "0.0.0.0:8000").
    pub listen_addr: String,
    /// Base URL of the analytics service the gateway proxies to.
    pub analytics_base_url: String,
    /// Per-request timeout for upstream calls, in seconds.
    pub request_timeout_secs: u64,
}

/// Settings for the analytics service.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsSettings {
    /// The address the analytics service listens on (e.g., "0.0.0.0:8001").
    pub listen_addr: String,
}

/// Parameters feeding the risk computations.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskSettings {
    /// Annual risk-free rate used by the reward/risk ratio (e.g., 0.02).
    pub risk_free_rate: f64,
}

/// Parameters for the demo-data seed command.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    /// How many days of price history to generate per asset.
    pub history_days: u32,
}
