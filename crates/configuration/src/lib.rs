use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{AnalyticsSettings, Config, GatewaySettings, RiskSettings, SeedSettings};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, and returns it.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        // Environment variables win over the file (e.g. QUANTVIEW_GATEWAY__LISTEN_ADDR).
        .add_source(config::Environment::with_prefix("QUANTVIEW").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if !(0.0..1.0).contains(&config.risk.risk_free_rate) {
        return Err(ConfigError::ValidationError(
            "risk.risk_free_rate must be in [0, 1)".to_string(),
        ));
    }
    if config.gateway.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "gateway.request_timeout_secs must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
