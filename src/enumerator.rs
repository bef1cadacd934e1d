//! enumerator.rs - Exhaustive simple-cycle enumeration
//!
//! For every starting currency `s` and every hop count `k` in `1..|S|`, yields
//! `(s, p1, ..., pk, s)` for each ordered arrangement of `k` distinct
//! currencies drawn from `S \ {s}`. Anchors are visited in sorted order and
//! arrangements in lexicographic index order, so the sequence is deterministic.
//!
//! The candidate count grows factorially with the number of currencies.

use crate::models::{ConversionCycle, Currency};
use crate::rate_table::RateTable;

/// Lazy iterator over every candidate cycle of a rate table.
#[derive(Debug, Clone)]
pub struct CycleEnumerator {
    anchors: Vec<Currency>,
    currencies: Vec<Currency>,
    max_hops: usize,
    anchor_idx: usize,
    hops: usize,
    pool: Vec<Currency>,
    arrangements: Option<Arrangements>,
}

impl CycleEnumerator {
    /// Enumerate cycles through all currencies of the table.
    pub fn new(table: &RateTable) -> Self {
        let currencies: Vec<Currency> = table.currencies().iter().cloned().collect();
        Self::with_anchors(currencies.clone(), currencies)
    }

    /// Enumerate only the cycles anchored at `anchor`.
    pub fn for_anchor(table: &RateTable, anchor: &Currency) -> Self {
        let currencies: Vec<Currency> = table.currencies().iter().cloned().collect();
        let anchors = if currencies.contains(anchor) {
            vec![anchor.clone()]
        } else {
            Vec::new()
        };
        Self::with_anchors(anchors, currencies)
    }

    fn with_anchors(anchors: Vec<Currency>, currencies: Vec<Currency>) -> Self {
        let max_hops = currencies.len().saturating_sub(1);
        // Fewer than two currencies: no cycle is possible.
        let anchor_idx = if currencies.len() < 2 { anchors.len() } else { 0 };

        CycleEnumerator {
            anchors,
            currencies,
            max_hops,
            anchor_idx,
            hops: 1,
            pool: Vec::new(),
            arrangements: None,
        }
    }

    /// Cap the number of intermediate hops. Values above `|S| - 1` have no effect.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = self.max_hops.min(max_hops);
        self
    }

    /// Total number of candidates this enumerator yields from the start,
    /// saturating at `u128::MAX`.
    pub fn candidate_count(&self) -> u128 {
        let n = self.currencies.len();
        if n < 2 {
            return 0;
        }
        let pool = (n - 1) as u128;
        let mut per_anchor: u128 = 0;
        let mut arrangements: u128 = 1;
        for k in 1..=self.max_hops as u128 {
            arrangements = arrangements.saturating_mul(pool - k + 1);
            per_anchor = per_anchor.saturating_add(arrangements);
        }
        per_anchor.saturating_mul(self.anchors.len() as u128)
    }
}

impl Iterator for CycleEnumerator {
    type Item = ConversionCycle;

    fn next(&mut self) -> Option<ConversionCycle> {
        loop {
            let anchor = self.anchors.get(self.anchor_idx)?;

            if self.arrangements.is_none() {
                if self.hops > self.max_hops {
                    self.anchor_idx += 1;
                    self.hops = 1;
                    continue;
                }
                self.pool = self
                    .currencies
                    .iter()
                    .filter(|c| *c != anchor)
                    .cloned()
                    .collect();
                self.arrangements = Some(Arrangements::new(self.pool.len(), self.hops));
            }

            let picked = self.arrangements.as_mut().and_then(Arrangements::next_indices);
            match picked {
                Some(indices) => {
                    let hops: Vec<Currency> =
                        indices.iter().map(|&i| self.pool[i].clone()).collect();
                    return Some(ConversionCycle::new(anchor, &hops));
                }
                None => {
                    self.arrangements = None;
                    self.hops += 1;
                }
            }
        }
    }
}

/// r-length ordered arrangements of `0..n` without repetition, in
/// lexicographic order.
#[derive(Debug, Clone)]
struct Arrangements {
    n: usize,
    r: usize,
    indices: Vec<usize>,
    cycles: Vec<usize>,
    started: bool,
    done: bool,
}

impl Arrangements {
    fn new(n: usize, r: usize) -> Self {
        Arrangements {
            n,
            r,
            indices: (0..n).collect(),
            cycles: (n.saturating_sub(r) + 1..=n).rev().collect(),
            started: false,
            done: r > n,
        }
    }

    fn next_indices(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices[..self.r].to_vec());
        }

        for i in (0..self.r).rev() {
            self.cycles[i] -= 1;
            if self.cycles[i] == 0 {
                self.indices[i..].rotate_left(1);
                self.cycles[i] = self.n - i;
            } else {
                let j = self.n - self.cycles[i];
                self.indices.swap(i, j);
                return Some(self.indices[..self.r].to_vec());
            }
        }

        self.done = true;
        None
    }
}
