use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::services::scanners::{
    MacdCrossoverConfig, MacdMomentumConfig, RangeBreakoutConfig, ResistanceBreakoutConfig,
    SupportResistanceConfig,
};
use crate::types::Granularity;

/// Yahoo Finance connection settings.
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// API root, without a trailing path.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Per-scanner thresholds and fetch plans.
#[derive(Debug, Clone, Default)]
pub struct ScannerSettings {
    pub macd: MacdMomentumConfig,
    pub crossover: MacdCrossoverConfig,
    pub range: RangeBreakoutConfig,
    pub resistance: ResistanceBreakoutConfig,
    pub support: SupportResistanceConfig,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only the first N symbols of the universe are scanned.
    pub symbol_limit: usize,
    /// Minimum spacing between provider requests.
    pub request_spacing: Duration,
    /// Symbols processed concurrently (1 = strictly sequential).
    pub max_concurrency: usize,
    /// Lifetime of fetched series in the shared cache (0 disables caching).
    pub cache_ttl: Duration,
    pub yahoo: YahooConfig,
    /// Replaces the built-in universe when set.
    pub symbols: Option<Vec<String>>,
    pub scanners: ScannerSettings,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparseable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let granularity = |key: &str| lookup(key).and_then(|v| Granularity::from_str(v.trim()));

        let mut scanners = ScannerSettings::default();
        if let Some(timeframe) = granularity("MACD_TIMEFRAME") {
            scanners.macd.timeframe = timeframe;
        }
        if let Some(days) = parse_as::<u32>(&lookup, "MACD_LOOKBACK_DAYS") {
            scanners.macd.lookback_days = days;
        }
        if let Some(timeframe) = granularity("CROSSOVER_TIMEFRAME") {
            scanners.crossover.timeframe = timeframe;
        }
        if let Some(days) = parse_as::<u32>(&lookup, "RANGE_LOOKBACK_DAYS") {
            scanners.range.lookback_days = days;
        }
        if let Some(length) = parse_as::<usize>(&lookup, "RANGE_ATR_LENGTH") {
            scanners.range.range.atr_length = length;
        }
        if let Some(days) = parse_as::<u32>(&lookup, "RESISTANCE_LOOKBACK_DAYS") {
            scanners.resistance.lookback_days = days;
        }
        if let Some(days) = parse_as::<u32>(&lookup, "SUPPORT_LOOKBACK_DAYS") {
            scanners.support.lookback_days = days;
        }

        let defaults = YahooConfig::default();

        Self {
            symbol_limit: parse_as(&lookup, "SCAN_SYMBOL_LIMIT").unwrap_or(100),
            request_spacing: Duration::from_millis(parse("SCAN_REQUEST_SPACING_MS").unwrap_or(100)),
            max_concurrency: parse_as::<usize>(&lookup, "SCAN_MAX_CONCURRENCY")
                .unwrap_or(1)
                .max(1),
            cache_ttl: Duration::from_secs(parse("SCAN_CACHE_TTL_SECS").unwrap_or(300)),
            yahoo: YahooConfig {
                base_url: lookup("YAHOO_BASE_URL").unwrap_or(defaults.base_url),
                timeout: parse("YAHOO_TIMEOUT_SECS")
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
            },
            symbols: lookup("SCAN_SYMBOLS")
                .map(|s| {
                    s.split(',')
                        .map(|sym| sym.trim().to_string())
                        .filter(|sym| !sym.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|list| !list.is_empty()),
            scanners,
        }
    }
}

fn parse_as<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    // =========================================================================
    // Default Tests
    // =========================================================================

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.symbol_limit, 100);
        assert_eq!(config.request_spacing, Duration::from_millis(100));
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.yahoo.base_url, "https://query1.finance.yahoo.com");
        assert_eq!(config.yahoo.timeout, Duration::from_secs(30));
        assert!(config.symbols.is_none());
    }

    #[test]
    fn test_scanner_defaults() {
        let settings = config_from(&[]).scanners;
        assert_eq!(settings.macd.timeframe, Granularity::FifteenMinutes);
        assert_eq!(settings.macd.lookback_days, 30);
        assert_eq!(settings.crossover.timeframe, Granularity::OneDay);
        assert_eq!(settings.range.lookback_days, 120);
        assert_eq!(settings.range.range.atr_length, 100);
        assert_eq!(settings.resistance.lookback_days, 90);
        assert_eq!(settings.support.lookback_days, 90);
    }

    // =========================================================================
    // Override Tests
    // =========================================================================

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SCAN_SYMBOL_LIMIT", "25"),
            ("SCAN_REQUEST_SPACING_MS", "0"),
            ("SCAN_MAX_CONCURRENCY", "4"),
            ("SCAN_CACHE_TTL_SECS", "0"),
            ("YAHOO_BASE_URL", "http://localhost:9000"),
            ("MACD_TIMEFRAME", "1h"),
            ("CROSSOVER_TIMEFRAME", "4h"),
            ("RANGE_ATR_LENGTH", "500"),
        ]);
        assert_eq!(config.symbol_limit, 25);
        assert!(config.request_spacing.is_zero());
        assert_eq!(config.max_concurrency, 4);
        assert!(config.cache_ttl.is_zero());
        assert_eq!(config.yahoo.base_url, "http://localhost:9000");
        assert_eq!(config.scanners.macd.timeframe, Granularity::OneHour);
        assert_eq!(config.scanners.crossover.fetch_plan(), (Granularity::FourHours, 60));
        assert_eq!(config.scanners.range.range.atr_length, 500);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("SCAN_SYMBOL_LIMIT", "lots"),
            ("SCAN_MAX_CONCURRENCY", "0"),
            ("MACD_TIMEFRAME", "2w"),
        ]);
        assert_eq!(config.symbol_limit, 100);
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.scanners.macd.timeframe, Granularity::FifteenMinutes);
    }

    #[test]
    fn test_symbol_override() {
        let config = config_from(&[("SCAN_SYMBOLS", "TCS.NS, INFY.NS,,WIPRO.NS ")]);
        assert_eq!(
            config.symbols,
            Some(vec!["TCS.NS".to_string(), "INFY.NS".to_string(), "WIPRO.NS".to_string()])
        );

        let blank = config_from(&[("SCAN_SYMBOLS", " , ")]);
        assert!(blank.symbols.is_none());
    }
}
