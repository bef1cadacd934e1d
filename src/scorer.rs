//! scorer.rs - Compounded-rate scoring and ranking of conversion cycles

use log::{log, Level};
use std::cmp::Ordering;

use crate::error::RateError;
use crate::models::{ArbitrageLoop, ConversionCycle};
use crate::rate_table::RateTable;

/// A loop is kept only when its product is strictly above this value.
/// No tolerance is applied, so products within rounding noise of 1.0 can
/// land on either side.
pub const PROFIT_THRESHOLD: f64 = 1.0;

/// Result of evaluating one candidate cycle.
#[derive(Debug)]
pub enum Evaluation {
    Profitable(ArbitrageLoop),
    Unprofitable { product: f64 },
    /// A hop had no direct rate; scoring stopped at that hop.
    Incomplete(RateError),
}

impl Evaluation {
    pub fn into_loop(self) -> Option<ArbitrageLoop> {
        match self {
            Evaluation::Profitable(arb) => Some(arb),
            _ => None,
        }
    }
}

/// Walk the cycle's edges, multiplying rates in order.
///
/// When `log_level` is set the candidate, its coefficients and its product
/// are logged at that level.
pub fn evaluate(
    cycle: &ConversionCycle,
    table: &RateTable,
    log_level: Option<Level>,
) -> Evaluation {
    let mut rates = Vec::with_capacity(cycle.sequence().len() - 1);
    let mut product = 1.0_f64;

    for (from, to) in cycle.edges() {
        match table.rate(from.as_str(), to.as_str()) {
            Ok(rate) => {
                rates.push(rate);
                product *= rate;
            }
            Err(e) => {
                if let Some(level) = log_level {
                    log!(level, "{} {:?} skipped: {}", cycle, rates, e);
                }
                return Evaluation::Incomplete(e);
            }
        }
    }

    if let Some(level) = log_level {
        log!(level, "{} {:?} product = {}", cycle, rates, product);
    }

    if product > PROFIT_THRESHOLD {
        Evaluation::Profitable(ArbitrageLoop::new(
            cycle.sequence().to_vec(),
            rates,
            product,
        ))
    } else {
        Evaluation::Unprofitable { product }
    }
}

/// Score a cycle, returning the loop only if it is complete and profitable.
pub fn score(cycle: &ConversionCycle, table: &RateTable) -> Option<ArbitrageLoop> {
    evaluate(cycle, table, None).into_loop()
}

/// Sort loops by product, highest first. Equal products are ordered by
/// their currency sequence so the result does not depend on discovery order.
pub fn rank(mut loops: Vec<ArbitrageLoop>) -> Vec<ArbitrageLoop> {
    loops.sort_by(compare_loops);
    loops
}

fn compare_loops(a: &ArbitrageLoop, b: &ArbitrageLoop) -> Ordering {
    b.product()
        .total_cmp(&a.product())
        .then_with(|| a.sequence().cmp(b.sequence()))
}
