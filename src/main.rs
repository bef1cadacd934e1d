//! main.rs - Entry point for the FX arbitrage scanner
//!
//! Fetches exchange rates, scans them for profitable conversion loops,
//! prints the ranked loops and optionally dry-runs the best one.

use fx_arbitrage::{
    ArbitrageDetector, Config, DryRunExecutor, HttpRateFeed, RateFeed, RateTable,
    StaticRateFeed, TradeExecutor, NAME, VERSION,
};
use log::{error, info};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║     FX Arbitrage Scanner v{:<31}║", VERSION);
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    info!("Starting {} v{}", NAME, VERSION);

    let config = Config::from_env()?;

    let feed: Arc<dyn RateFeed> = if config.use_sample_rates {
        Arc::new(StaticRateFeed::sample()?)
    } else {
        Arc::new(HttpRateFeed::new(
            &config.rates_url,
            config.request_timeout,
            config.cache_ttl,
        )?)
    };
    info!("✓ Rate feed initialized: {}", feed.name());

    let detector = ArbitrageDetector::new(config.scan_options());
    let executor = DryRunExecutor::new(config.stake);

    if config.scan_interval.is_zero() {
        return scan_once(feed.as_ref(), &detector, &executor, &config).await;
    }

    info!("🔄 Starting scan loop (interval: {:?})...", config.scan_interval);
    let mut interval = tokio::time::interval(config.scan_interval);
    let mut scan_count: u64 = 0;

    loop {
        interval.tick().await;
        scan_count += 1;

        info!("📡 Scan #{}", scan_count);
        if let Err(e) = scan_once(feed.as_ref(), &detector, &executor, &config).await {
            error!("✗ Scan #{} failed: {:#}", scan_count, e);
        }
    }
}

async fn scan_once(
    feed: &dyn RateFeed,
    detector: &ArbitrageDetector,
    executor: &DryRunExecutor,
    config: &Config,
) -> anyhow::Result<()> {
    let snapshot = feed.fetch_rates().await?;
    let table = RateTable::build(&snapshot.rates)?;
    let report = detector.scan(&table);

    if report.is_empty() {
        println!("No arbitrage loops found.");
        return Ok(());
    }

    println!("Arbitrage loops:");
    for arb in &report.loops {
        println!("{}", arb);
    }

    if config.execute_best {
        if let Some(best) = report.best() {
            executor.execute(best).await?;
        }
    }

    Ok(())
}
