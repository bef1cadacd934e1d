//! detector.rs - Arbitrage scan orchestration
//!
//! Drives enumerate -> score -> rank over a rate table, either on the calling
//! thread or with one blocking worker per starting currency.

use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::enumerator::CycleEnumerator;
use crate::models::{ArbitrageLoop, Currency};
use crate::rate_table::RateTable;
use crate::scorer::{self, Evaluation};

/// Tuning knobs for a scan. The default reproduces the exhaustive search.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Cap on intermediate hops (None = up to |S| - 1)
    pub max_hops: Option<usize>,
    /// Stop enumerating once this much time has elapsed
    pub deadline: Option<Duration>,
    /// Log every candidate at this level
    pub candidate_log_level: Option<log::Level>,
}

/// Ranked loops plus counters describing how the scan went.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub loops: Vec<ArbitrageLoop>,
    pub candidates: u64,
    pub incomplete: u64,
    pub unprofitable: u64,
    /// True when the deadline cut enumeration short
    pub truncated: bool,
    pub elapsed: Duration,
}

impl ScanReport {
    pub fn best(&self) -> Option<&ArbitrageLoop> {
        self.loops.first()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    fn absorb(&mut self, other: ScanReport) {
        self.loops.extend(other.loops);
        self.candidates += other.candidates;
        self.incomplete += other.incomplete;
        self.unprofitable += other.unprofitable;
        self.truncated |= other.truncated;
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArbitrageDetector {
    options: ScanOptions,
}

impl ArbitrageDetector {
    pub fn new(options: ScanOptions) -> Self {
        ArbitrageDetector { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan every starting currency on the current thread.
    pub fn scan(&self, table: &RateTable) -> ScanReport {
        let started = Instant::now();
        let enumerator = self.limit(CycleEnumerator::new(table));
        info!(
            "Scanning {} currencies ({} candidate cycles)",
            table.currencies().len(),
            enumerator.candidate_count()
        );

        let mut report = self.run(enumerator, table, started);
        report.loops = scorer::rank(report.loops);
        report.elapsed = started.elapsed();
        self.log_summary(&report);
        report
    }

    /// Scan with one blocking task per starting currency.
    ///
    /// Worker results are merged in anchor order before ranking, so the loops
    /// match those of [`ArbitrageDetector::scan`].
    pub async fn scan_concurrent(&self, table: Arc<RateTable>) -> anyhow::Result<ScanReport> {
        let started = Instant::now();
        let anchors: Vec<Currency> = table.currencies().iter().cloned().collect();
        info!("Scanning {} currencies, one worker per starting currency", anchors.len());

        let mut handles = Vec::with_capacity(anchors.len());
        for anchor in anchors {
            let table = Arc::clone(&table);
            let detector = self.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let enumerator = detector.limit(CycleEnumerator::for_anchor(&table, &anchor));
                detector.run(enumerator, &table, started)
            }));
        }

        let mut report = ScanReport::default();
        for handle in handles {
            report.absorb(handle.await?);
        }

        report.loops = scorer::rank(report.loops);
        report.elapsed = started.elapsed();
        self.log_summary(&report);
        Ok(report)
    }

    fn limit(&self, enumerator: CycleEnumerator) -> CycleEnumerator {
        match self.options.max_hops {
            Some(max) => enumerator.with_max_hops(max),
            None => enumerator,
        }
    }

    fn run(&self, enumerator: CycleEnumerator, table: &RateTable, started: Instant) -> ScanReport {
        let mut report = ScanReport::default();
        let level = self.options.candidate_log_level;

        for cycle in enumerator {
            if let Some(deadline) = self.options.deadline {
                if started.elapsed() >= deadline {
                    report.truncated = true;
                    break;
                }
            }

            report.candidates += 1;
            match scorer::evaluate(&cycle, table, level) {
                Evaluation::Profitable(arb) => report.loops.push(arb),
                Evaluation::Unprofitable { .. } => report.unprofitable += 1,
                Evaluation::Incomplete(_) => report.incomplete += 1,
            }
        }

        report
    }

    fn log_summary(&self, report: &ScanReport) {
        if report.truncated {
            warn!(
                "Scan deadline reached after {} candidates; results are partial",
                report.candidates
            );
        }
        debug!(
            "{} candidates: {} profitable, {} unprofitable, {} incomplete",
            report.candidates,
            report.loops.len(),
            report.unprofitable,
            report.incomplete
        );
        info!(
            "Scan finished in {:?}: {} arbitrage loops",
            report.elapsed,
            report.loops.len()
        );
    }
}

/// Every profitable loop in the table, ranked, using the exhaustive search.
pub fn find_arbitrage_loops(table: &RateTable) -> Vec<ArbitrageLoop> {
    ArbitrageDetector::default().scan(table).loops
}
