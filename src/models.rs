//! models.rs - Core data structures for the arbitrage scanner
//!
//! Defines Currency, raw quote snapshots, conversion cycles, arbitrage loops
//! and the trade receipts produced when a loop is handed to an executor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// An opaque currency symbol such as "USD". Equality is exact string match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(symbol: &str) -> Self {
        Currency(symbol.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Currency {
    fn from(symbol: &str) -> Self {
        Currency::new(symbol)
    }
}

impl Borrow<str> for Currency {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rate value as delivered by the quote service: a decimal string or a bare number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawRate {
    Text(String),
    Number(f64),
}

impl RawRate {
    /// Parse into a float. Does not check sign or finiteness.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawRate::Text(s) => s.trim().parse::<f64>().ok(),
            RawRate::Number(n) => Some(*n),
        }
    }
}

impl From<&str> for RawRate {
    fn from(value: &str) -> Self {
        RawRate::Text(value.to_string())
    }
}

impl From<f64> for RawRate {
    fn from(value: f64) -> Self {
        RawRate::Number(value)
    }
}

impl fmt::Display for RawRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawRate::Text(s) => write!(f, "\"{}\"", s),
            RawRate::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Flat `"FROM_TO" -> rate` mapping, keyed in sorted order.
pub type RawRates = BTreeMap<String, RawRate>;

/// A set of raw quotes together with when and where they were obtained.
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub rates: RawRates,
    pub fetched_at: chrono::DateTime<chrono::Utc>,
    pub source: String,
}

impl RateSnapshot {
    pub fn new(rates: RawRates, source: &str) -> Self {
        RateSnapshot {
            rates,
            fetched_at: chrono::Utc::now(),
            source: source.to_string(),
        }
    }

    /// Check if the snapshot is older than `max_age`
    pub fn is_stale(&self, max_age: std::time::Duration) -> bool {
        let age = chrono::Utc::now().signed_duration_since(self.fetched_at);
        chrono::Duration::from_std(max_age).map_or(false, |max| age > max)
    }
}

/// A candidate round trip `(c0, c1, ..., ck, c0)` produced during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCycle {
    sequence: Vec<Currency>,
}

impl ConversionCycle {
    /// Build a cycle from an anchor and its ordered intermediate hops.
    pub fn new(anchor: &Currency, hops: &[Currency]) -> Self {
        let mut sequence = Vec::with_capacity(hops.len() + 2);
        sequence.push(anchor.clone());
        sequence.extend(hops.iter().cloned());
        sequence.push(anchor.clone());
        ConversionCycle { sequence }
    }

    pub fn sequence(&self) -> &[Currency] {
        &self.sequence
    }

    pub fn anchor(&self) -> &Currency {
        &self.sequence[0]
    }

    /// Consecutive `(from, to)` pairs along the cycle.
    pub fn edges(&self) -> impl Iterator<Item = (&Currency, &Currency)> + '_ {
        self.sequence.windows(2).map(|w| (&w[0], &w[1]))
    }
}

impl fmt::Display for ConversionCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_path(&self.sequence))
    }
}

/// A profitable conversion cycle: the currencies visited, the rate applied on
/// each hop, and their compounded product (always > 1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArbitrageLoop {
    sequence: Vec<Currency>,
    rates: Vec<f64>,
    product: f64,
}

impl ArbitrageLoop {
    pub(crate) fn new(sequence: Vec<Currency>, rates: Vec<f64>, product: f64) -> Self {
        ArbitrageLoop {
            sequence,
            rates,
            product,
        }
    }

    /// Currencies visited, first == last.
    pub fn sequence(&self) -> &[Currency] {
        &self.sequence
    }

    /// Rate applied on each hop, in order.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn product(&self) -> f64 {
        self.product
    }

    /// Gain over one full round trip, in percent.
    pub fn profit_percentage(&self) -> f64 {
        (self.product - 1.0) * 100.0
    }

    pub fn hop_count(&self) -> usize {
        self.rates.len()
    }

    pub fn start(&self) -> Option<&Currency> {
        self.sequence.first()
    }

    /// Format the loop as a string (e.g., "USD -> JPY -> EUR -> USD")
    pub fn format_path(&self) -> String {
        format_path(&self.sequence)
    }
}

impl fmt::Display for ArbitrageLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | rates {:?} | product {} ({:+.4}%)",
            self.format_path(),
            self.rates,
            self.product,
            self.profit_percentage()
        )
    }
}

fn format_path(sequence: &[Currency]) -> String {
    sequence
        .iter()
        .map(Currency::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A single simulated conversion within an executed loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeLeg {
    pub from: Currency,
    pub to: Currency,
    pub rate: Decimal,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
}

/// Outcome of handing a loop to a trade executor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub legs: Vec<TradeLeg>,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    pub profit: Decimal,
    pub executed_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_currency_display() {
        let usd = Currency::new("USD");
        assert_eq!(usd.to_string(), "USD");
        assert_eq!(usd, Currency::from("USD"));
        assert_ne!(usd, Currency::from("usd"));
    }

    #[test]
    fn test_raw_rate_from_json() {
        let rates: RawRates =
            serde_json::from_str(r#"{"USD_JPY": "92.4744496", "JPY_USD": 0.010704}"#).unwrap();

        assert_eq!(rates["USD_JPY"], RawRate::Text("92.4744496".to_string()));
        assert_eq!(rates["JPY_USD"], RawRate::Number(0.010704));
        assert_eq!(rates["USD_JPY"].as_f64(), Some(92.4744496));
    }

    #[test]
    fn test_conversion_cycle_edges() {
        let hops = vec![Currency::new("B"), Currency::new("C")];
        let cycle = ConversionCycle::new(&Currency::new("A"), &hops);
        let edges: Vec<_> = cycle
            .edges()
            .map(|(f, t)| format!("{}{}", f, t))
            .collect();

        assert_eq!(edges, vec!["AB", "BC", "CA"]);
        assert_eq!(cycle.to_string(), "A -> B -> C -> A");
        assert_eq!(cycle.anchor().as_str(), "A");
    }

    #[test]
    fn test_arbitrage_loop_profit() {
        let arb = ArbitrageLoop::new(
            vec!["A".into(), "B".into(), "A".into()],
            vec![2.0, 0.6],
            1.2,
        );

        assert_eq!(arb.hop_count(), 2);
        assert_eq!(arb.format_path(), "A -> B -> A");
        assert!((arb.profit_percentage() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_staleness() {
        let mut snapshot = RateSnapshot::new(RawRates::new(), "test");
        snapshot.fetched_at = chrono::Utc::now() - chrono::Duration::seconds(120);

        assert!(snapshot.is_stale(Duration::from_secs(60))); // 120s old > 60s max
        assert!(!snapshot.is_stale(Duration::from_secs(180))); // 120s old < 180s max
    }

    #[test]
    fn test_snapshot_staleness_below_one_second() {
        let mut snapshot = RateSnapshot::new(RawRates::new(), "test");
        snapshot.fetched_at = chrono::Utc::now() - chrono::Duration::milliseconds(500);

        assert!(snapshot.is_stale(Duration::ZERO));
        assert!(snapshot.is_stale(Duration::from_millis(100)));
        assert!(!snapshot.is_stale(Duration::from_secs(60)));
    }

    #[test]
    fn test_deserialized_empty_loop_has_no_start() {
        let arb: ArbitrageLoop =
            serde_json::from_str(r#"{"sequence": [], "rates": [], "product": 2.0}"#).unwrap();

        assert!(arb.start().is_none());
        assert_eq!(arb.hop_count(), 0);
        assert_eq!(arb.format_path(), "");
    }
}
