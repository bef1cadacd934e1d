//! rate_table.rs - Validated directed exchange-rate table
//!
//! Built once from the quote service's flat `"FROM_TO" -> rate` mapping and
//! immutable afterwards. Self-pairs are dropped, every stored rate is finite
//! and positive, and a missing pair means "no direct conversion".

use log::debug;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::RateError;
use crate::models::{Currency, RawRates};

/// Separator between the two symbols of a raw key
pub const PAIR_DELIMITER: char = '_';

#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: BTreeMap<Currency, BTreeMap<Currency, f64>>,
    currencies: BTreeSet<Currency>,
}

impl RateTable {
    /// Build a table from raw quotes.
    ///
    /// Fails on the first key that is not a `FROM_TO` pair or the first value
    /// that is not a finite positive number. No partial table is returned.
    /// Self-pair values are skipped without being parsed.
    pub fn build(raw: &RawRates) -> Result<Self, RateError> {
        let mut table = RateTable::default();

        for (key, value) in raw {
            let (from, to) = split_pair(key)?;
            if from == to {
                continue;
            }

            let rate = value
                .as_f64()
                .filter(|r| r.is_finite() && *r > 0.0)
                .ok_or_else(|| RateError::Validation {
                    key: key.clone(),
                    value: value.to_string(),
                })?;

            let from = Currency::new(from);
            let to = Currency::new(to);
            table.currencies.insert(from.clone());
            table.currencies.insert(to.clone());
            table.rates.entry(from).or_default().insert(to, rate);
        }

        debug!(
            "Built rate table: {} currencies, {} rates",
            table.currencies.len(),
            table.len()
        );
        Ok(table)
    }

    /// Decode a JSON object of raw quotes and build the table from it.
    ///
    /// Values must be JSON strings or numbers. Any other JSON type (null,
    /// boolean, array, object) fails decoding with `RateError::Decode`, before
    /// value validation runs.
    pub fn from_json(json: &str) -> Result<Self, RateError> {
        let raw: RawRates = serde_json::from_str(json)?;
        Self::build(&raw)
    }

    /// Rate for converting one unit of `from` into `to`.
    pub fn rate(&self, from: &str, to: &str) -> Result<f64, RateError> {
        self.rates
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .ok_or_else(|| RateError::MissingRate {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Every symbol seen on either side of a stored rate.
    pub fn currencies(&self) -> &BTreeSet<Currency> {
        &self.currencies
    }

    /// Number of stored directed rates
    pub fn len(&self) -> usize {
        self.rates.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// All stored `(from, to, rate)` triples in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&Currency, &Currency, f64)> + '_ {
        self.rates
            .iter()
            .flat_map(|(from, row)| row.iter().map(move |(to, rate)| (from, to, *rate)))
    }
}

fn split_pair(key: &str) -> Result<(&str, &str), RateError> {
    let mut parts = key.split(PAIR_DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(from), Some(to), None) if !from.is_empty() && !to.is_empty() => Ok((from, to)),
        _ => Err(RateError::Parse {
            key: key.to_string(),
        }),
    }
}
