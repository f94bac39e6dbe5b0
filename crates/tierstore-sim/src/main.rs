//! Tierstore Scenario Runner CLI
//!
//! Runs the book scenario against in-memory tiers, or a Redis cache tier
//! when `REDIS_URL` is set.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tierstore_domain::Operation;
use tierstore_sim::{Config, ScenarioOptions, scenario, tiers};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "tierstore-sim")]
#[command(about = "Exercise the two-tier repository strategies")]
struct Args {
    /// Key the scenario writes under
    #[arg(short, long, default_value = "b1")]
    key: String,

    /// Titles written in order, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "X,Y")]
    titles: Vec<String>,

    /// Read strategy (default, main, cache, main_sync, cache_sync)
    #[arg(long, default_value = "default")]
    read_op: Operation,

    /// Write and delete strategy
    #[arg(long, default_value = "default")]
    write_op: Operation,

    /// Fail instead of serving stale data during the outage
    #[arg(long)]
    no_fallback: bool,

    /// Leave the key in place at the end
    #[arg(long)]
    keep: bool,

    /// Seconds past the freshness window the outage book is dated
    #[arg(long, default_value = "3600")]
    staleness_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level.clone().into());
    if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let args = Args::parse();

    info!(
        version = tierstore_sim::VERSION,
        key = %args.key,
        read_op = %args.read_op,
        write_op = %args.write_op,
        redis = config.redis_url.is_some(),
        "Starting tierstore scenario"
    );

    let tiers = tiers::from_config(&config).await?;
    let options = ScenarioOptions {
        key: args.key,
        titles: args.titles,
        read_op: args.read_op,
        write_op: args.write_op,
        accept_stale: !args.no_fallback,
        delete: !args.keep,
        staleness: Duration::from_secs(args.staleness_secs),
    };

    let report = scenario::run(&tiers, &options, config.max_age).await;

    info!(
        steps = report.steps.len(),
        failures = report.failures(),
        "Scenario complete"
    );

    Ok(())
}
