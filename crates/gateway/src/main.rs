use std::net::SocketAddr;
use std::time::Duration;

// This main function is the entry point when running `cargo run -p gateway`.
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
    let addr: SocketAddr = config.gateway.listen_addr.parse()?;
    gateway::run_server(
        addr,
        &config.gateway.analytics_base_url,
        Duration::from_secs(config.gateway.request_timeout_secs),
    )
    .await
}
