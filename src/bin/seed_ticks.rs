//! Random-walk tick generator.
//!
//! Fills the tick store with synthetic prices so the server has history to
//! train on. Each step moves the price by a uniform amount in
//! `[-max_step, max_step)`.

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use pricecast::domain::market::Tick;
use pricecast::domain::repositories::TickRepository;
use pricecast::infrastructure::{Database, SqliteTickRepository};
use rand::Rng;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Tick store URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://data/ticks.db")]
    database_url: String,

    /// Symbol written with every tick
    #[arg(short, long, default_value = "BTC-USD")]
    symbol: String,

    /// Number of ticks to generate
    #[arg(short, long, default_value_t = 500)]
    count: usize,

    /// First price of the walk
    #[arg(long, default_value_t = 60000.0)]
    start_price: f64,

    /// Largest absolute price change per tick
    #[arg(long, default_value_t = 100.0)]
    max_step: f64,

    /// Seconds between consecutive ticks; the walk ends at the current time
    #[arg(long, default_value_t = 1)]
    interval_secs: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    anyhow::ensure!(cli.max_step > 0.0, "--max-step must be positive");
    anyhow::ensure!(cli.interval_secs > 0, "--interval-secs must be positive");

    let db = Database::new(&cli.database_url).await?;
    let repository = SqliteTickRepository::new(db.pool.clone());

    let interval = Duration::seconds(cli.interval_secs);
    let mut timestamp = Utc::now() - interval * cli.count as i32;
    let mut price = cli.start_price;
    let mut rng = rand::rng();

    for _ in 0..cli.count {
        price += rng.random_range(-cli.max_step..cli.max_step);
        timestamp += interval;
        repository.save(&cli.symbol, &Tick::new(timestamp, price)).await?;
    }

    info!(
        "Wrote {} {} ticks (last price {:.2}); store now holds {} ticks",
        cli.count,
        cli.symbol,
        price,
        repository.count().await?
    );
    Ok(())
}
