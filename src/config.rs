//! config.rs - Runtime configuration from environment variables

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::detector::ScanOptions;
use crate::error::ConfigError;
use crate::rate_feed::DEFAULT_RATES_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub rates_url: String,
    /// Use the recorded sample quote instead of the network
    pub use_sample_rates: bool,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    /// Zero means scan once and exit
    pub scan_interval: Duration,
    pub max_hops: Option<usize>,
    pub deadline: Option<Duration>,
    /// Log every candidate cycle at info level
    pub trace_candidates: bool,
    /// Hand the best loop to the dry-run executor
    pub execute_best: bool,
    pub stake: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rates_url: DEFAULT_RATES_URL.to_string(),
            use_sample_rates: false,
            request_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(60),
            scan_interval: Duration::ZERO,
            max_hops: None,
            deadline: None,
            trace_candidates: false,
            execute_best: false,
            stake: Decimal::from(1000),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from a specific env file. Variables already set in the process
    /// environment take precedence over the file.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let mut file_vars = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(ConfigError::EnvFile)? {
            let (key, value) = item.map_err(ConfigError::EnvFile)?;
            file_vars.insert(key, value);
        }
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file_vars.get(key).cloned()))
    }

    /// Build from any key lookup; unset or empty keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(url) = get("FX_RATES_URL") {
            config.rates_url = url;
        }
        if let Some(v) = get("FX_USE_SAMPLE_RATES") {
            config.use_sample_rates = parse_bool("FX_USE_SAMPLE_RATES", &v)?;
        }
        if let Some(v) = get("FX_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse("FX_REQUEST_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = get("FX_CACHE_TTL_SECS") {
            config.cache_ttl = Duration::from_secs(parse("FX_CACHE_TTL_SECS", &v)?);
        }
        if let Some(v) = get("FX_SCAN_INTERVAL_SECS") {
            config.scan_interval = Duration::from_secs(parse("FX_SCAN_INTERVAL_SECS", &v)?);
        }
        if let Some(v) = get("FX_MAX_HOPS") {
            let hops: usize = parse("FX_MAX_HOPS", &v)?;
            if hops == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "FX_MAX_HOPS",
                    reason: "must be at least 1".to_string(),
                });
            }
            config.max_hops = Some(hops);
        }
        if let Some(v) = get("FX_DEADLINE_MS") {
            config.deadline = Some(Duration::from_millis(parse("FX_DEADLINE_MS", &v)?));
        }
        if let Some(v) = get("FX_TRACE_CANDIDATES") {
            config.trace_candidates = parse_bool("FX_TRACE_CANDIDATES", &v)?;
        }
        if let Some(v) = get("FX_EXECUTE_BEST") {
            config.execute_best = parse_bool("FX_EXECUTE_BEST", &v)?;
        }
        if let Some(v) = get("FX_STAKE") {
            let stake: Decimal = parse("FX_STAKE", &v)?;
            if stake <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue {
                    field: "FX_STAKE",
                    reason: "must be positive".to_string(),
                });
            }
            config.stake = stake;
        }

        Ok(config)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            max_hops: self.max_hops,
            deadline: self.deadline,
            candidate_log_level: self.trace_candidates.then_some(log::Level::Info),
        }
    }
}

fn parse<T>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            field,
            reason: format!("'{}': {}", value, e),
        })
}

fn parse_bool(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field,
            reason: format!("'{}' is not a boolean", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.rates_url, DEFAULT_RATES_URL);
        assert!(config.scan_interval.is_zero());
        assert!(!config.execute_best);
        assert_eq!(config.stake, dec!(1000));

        let options = config.scan_options();
        assert!(options.max_hops.is_none());
        assert!(options.candidate_log_level.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FX_USE_SAMPLE_RATES", "yes"),
            ("FX_SCAN_INTERVAL_SECS", "30"),
            ("FX_MAX_HOPS", "2"),
            ("FX_DEADLINE_MS", "250"),
            ("FX_TRACE_CANDIDATES", "1"),
            ("FX_STAKE", "2500.50"),
        ])
        .unwrap();

        assert!(config.use_sample_rates);
        assert_eq!(config.scan_interval, Duration::from_secs(30));
        assert_eq!(config.stake, dec!(2500.50));

        let options = config.scan_options();
        assert_eq!(options.max_hops, Some(2));
        assert_eq!(options.deadline, Some(Duration::from_millis(250)));
        // Visible under the default `info` filter.
        assert_eq!(options.candidate_log_level, Some(log::Level::Info));
    }

    fn write_temp_env(contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        path.push(format!("fx-arbitrage-test-{}.env", nanos));
        fs::write(&path, contents).expect("write temp env file");
        path
    }

    #[test]
    fn test_from_env_file() {
        let path = write_temp_env("FX_SCAN_INTERVAL_SECS=45\nFX_EXECUTE_BEST=true\nFX_STAKE=250\n");
        let result = Config::from_env_file(&path);
        let _ = fs::remove_file(&path);

        let config = result.unwrap();
        assert_eq!(config.scan_interval, Duration::from_secs(45));
        assert!(config.execute_best);
        assert_eq!(config.stake, dec!(250));
    }

    #[test]
    fn test_missing_env_file() {
        let path = std::env::temp_dir().join("fx-arbitrage-no-such-file.env");
        assert!(matches!(
            Config::from_env_file(&path),
            Err(ConfigError::EnvFile(_))
        ));
    }

    #[test]
    fn test_empty_value_keeps_default() {
        let config = load(&[("FX_RATES_URL", "  ")]).unwrap();
        assert_eq!(config.rates_url, DEFAULT_RATES_URL);
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("FX_USE_SAMPLE_RATES", "maybe"),
            ("FX_SCAN_INTERVAL_SECS", "-5"),
            ("FX_MAX_HOPS", "0"),
            ("FX_STAKE", "0"),
            ("FX_STAKE", "lots"),
        ] {
            match load(&[(key, value)]) {
                Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, key),
                Err(other) => panic!("{}={} gave unexpected error {}", key, value, other),
                Ok(_) => panic!("{}={} should be rejected", key, value),
            }
        }
    }
}
