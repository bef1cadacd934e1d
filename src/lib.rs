//! FX Arbitrage Scanner
//!
//! Finds every multi-hop currency conversion cycle whose compounded rate
//! exceeds 1 and ranks them by profitability.
//!
//! # Pipeline
//! - RateTable: validated directed rates built from `"FROM_TO"` quotes
//! - CycleEnumerator: every simple cycle through every starting currency
//! - Scorer: compounded product per cycle, strict `> 1` filter, ranking
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Main Loop                         │
//! │  (Fetch quotes, scan, report, optionally execute)    │
//! └────────────────────────┬────────────────────────────┘
//!                          │
//!          ┌───────────────┼───────────────┐
//!          ▼               ▼               ▼
//! ┌─────────────────┐ ┌──────────────┐ ┌─────────────────┐
//! │  RateFeed       │ │ Arbitrage    │ │ TradeExecutor   │
//! │  - Http         │ │ Detector     │ │ - DryRun        │
//! │  - Static       │ │              │ │                 │
//! └─────────────────┘ └──────┬───────┘ └─────────────────┘
//!                            │
//!          ┌─────────────────┼─────────────────┐
//!          ▼                 ▼                 ▼
//!   ┌────────────┐   ┌─────────────────┐   ┌────────┐
//!   │ RateTable  │──▶│ CycleEnumerator │──▶│ Scorer │
//!   └────────────┘   └─────────────────┘   └────────┘
//! ```

pub mod config;
pub mod detector;
pub mod enumerator;
pub mod error;
pub mod executor;
pub mod models;
pub mod rate_feed;
pub mod rate_table;
pub mod scorer;

// Re-export commonly used types
pub use config::Config;
pub use detector::{find_arbitrage_loops, ArbitrageDetector, ScanOptions, ScanReport};
pub use enumerator::CycleEnumerator;
pub use error::{ConfigError, RateError};
pub use executor::{DryRunExecutor, TradeExecutor};
pub use models::{
    ArbitrageLoop,
    ConversionCycle,
    Currency,
    RateSnapshot,
    RawRate,
    RawRates,
    TradeLeg,
    TradeReceipt,
};
pub use rate_feed::{HttpRateFeed, RateFeed, StaticRateFeed};
pub use rate_table::RateTable;
pub use scorer::{rank, score};

/// Version of the scanner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the package
pub const NAME: &str = env!("CARGO_PKG_NAME");
