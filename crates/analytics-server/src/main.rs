use std::net::SocketAddr;

// This main function is the entry point when running `cargo run -p analytics-server`.
// Its only job is to load the settings and call the crate's `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = configuration::load_config()?;
    let addr: SocketAddr = config.analytics.listen_addr.parse()?;
    analytics_server::run_server(addr, config.risk.risk_free_rate).await
}
