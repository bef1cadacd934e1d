//! error.rs - Error types for rate table construction and configuration

use thiserror::Error;

/// Errors raised while building or querying a [`crate::RateTable`].
#[derive(Error, Debug)]
pub enum RateError {
    /// A raw key did not split into exactly two non-empty currency symbols.
    #[error("cannot parse currency pair from key '{key}'")]
    Parse { key: String },

    /// A raw value is not a finite positive real number.
    #[error("invalid rate for '{key}': {value}")]
    Validation { key: String, value: String },

    /// No direct conversion is stored for the pair.
    #[error("no rate from {from} to {to}")]
    MissingRate { from: String, to: String },

    #[error("failed to decode rate JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read env file: {0}")]
    EnvFile(#[source] dotenvy::Error),
}
