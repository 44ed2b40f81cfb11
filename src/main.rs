use chrono::{Days, Utc};
use clap::{Parser, Subcommand};
use database::MarketRepository;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::SocketAddr;
use std::time::Duration;

/// The main entry point for the Quantview analytics platform.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables (DATABASE_URL) from .env, when present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = configuration::load_config()?;

    match cli.command {
        Commands::AnalyticsServer => {
            let addr: SocketAddr = config.analytics.listen_addr.parse()?;
            analytics_server::run_server(addr, config.risk.risk_free_rate).await
        }
        Commands::Gateway => {
            let addr: SocketAddr = config.gateway.listen_addr.parse()?;
            gateway::run_server(
                addr,
                &config.gateway.analytics_base_url,
                Duration::from_secs(config.gateway.request_timeout_secs),
            )
            .await
        }
        Commands::Seed(args) => handle_seed(args, config.seed.history_days).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A two-service stock analytics platform: indicators, risk and
/// opportunity scoring behind an API gateway.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analytics service.
    AnalyticsServer,
    /// Run the public API gateway.
    Gateway,
    /// Populate the store with the demo assets and a generated price history.
    Seed(SeedArgs),
}

#[derive(Parser)]
struct SeedArgs {
    /// Seed for the price-history generator, for a reproducible dataset.
    #[arg(long)]
    seed: Option<u64>,
}

// ==============================================================================
// Seed Command Logic
// ==============================================================================

/// Upserts the demo assets and backfills each with a generated daily
/// price history ending today.
async fn handle_seed(args: SeedArgs, history_days: u32) -> anyhow::Result<()> {
    let db_pool = database::connect().await?;
    database::run_migrations(&db_pool).await?;
    let repo = MarketRepository::new(db_pool);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let quotes = provider::synthetic::fallback_quotes();
    let days = history_days as usize;
    println!(
        "Seeding {} assets with {} days of price history each",
        quotes.len(),
        days
    );

    let progress_bar = ProgressBar::new((quotes.len() * days) as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let today = Utc::now().date_naive();
    for quote in quotes {
        let profile = quote.profile();
        progress_bar.set_message(format!("Seeding {}...", profile.symbol));
        repo.upsert_asset(&profile).await?;

        let closes = provider::synthetic::price_series(
            &profile.symbol,
            days,
            provider::synthetic::RISK_SIGMA,
            &mut rng,
        );
        for (i, &close) in closes.iter().enumerate() {
            // Oldest first; each day opens at the previous close.
            let date = today - Days::new((days - 1 - i) as u64);
            let open = if i == 0 { close } else { closes[i - 1] };
            let volume = rand::Rng::gen_range(&mut rng, 1_000_000..5_000_000);
            repo.insert_price(&profile.symbol, date, open, close, volume)
                .await?;
            progress_bar.inc(1);
        }
    }

    progress_bar.finish_with_message("Seed complete");
    Ok(())
}
