//! Technical indicator implementations.
//!
//! Every indicator is a pure function over a price or bar slice returning a
//! sequence aligned 1:1 with its input. Warm-up positions are `None`, never
//! zero.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volume;

pub use atr::{atr, true_range, Atr};
pub use bollinger::{bollinger_bands, BollingerBands, BollingerLines};
pub use ema::{ema, Ema};
pub use macd::{Macd, MacdLines, MIN_MACD_BARS};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};
pub use stochastic::{stochastic, Stochastic, StochasticLines};
pub use volume::volume_sma;

use crate::types::Bar;

/// One derived channel, aligned with the source series.
pub type Channel = Vec<Option<f64>>;

/// Named channels aligned 1:1 with a series.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    len: usize,
    channels: Vec<(&'static str, Channel)>,
}

impl IndicatorFrame {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            channels: Vec::new(),
        }
    }

    /// Add a channel. Channels of the wrong length are a programming error.
    pub fn with_channel(mut self, name: &'static str, values: Channel) -> Self {
        assert_eq!(
            values.len(),
            self.len,
            "channel {} has {} values for a frame of {}",
            name,
            values.len(),
            self.len
        );
        self.channels.push((name, values));
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|(name, _)| *name).collect()
    }

    pub fn channel(&self, name: &str) -> Option<&[Option<f64>]> {
        self.channels
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Latest value of a channel, if defined.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.channel(name)?.last().copied().flatten()
    }
}

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of bars for at least one defined value.
    fn min_periods(&self) -> usize;

    /// Compute the aligned frame.
    /// Returns None if there are fewer than `min_periods` bars.
    fn compute(&self, bars: &[Bar]) -> Option<IndicatorFrame>;
}

/// Get all available indicators with their default periods.
pub fn all_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        // Trend
        Box::new(Sma::new(20)),
        Box::new(Sma::new(50)),
        Box::new(Ema::new(12)),
        Box::new(Ema::new(26)),
        Box::new(Macd::default()),
        // Momentum
        Box::new(Rsi::default()),
        Box::new(Stochastic::default()),
        // Volatility
        Box::new(BollingerBands::default()),
        Box::new(Atr::default()),
    ]
}

/// Trailing mean over `period` values; the first `period - 1` entries are absent.
pub fn rolling_mean(values: &[f64], period: usize) -> Channel {
    rolling(values, period, |window| {
        Some(window.iter().sum::<f64>() / window.len() as f64)
    })
}

/// Trailing mean over optional values; any absent input in the window makes the output absent.
pub fn rolling_mean_opt(values: &[Option<f64>], period: usize) -> Channel {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            let sum = window.iter().copied().sum::<Option<f64>>()?;
            Some(sum / period as f64)
        })
        .collect()
}

/// Trailing sample standard deviation (n - 1 denominator).
pub fn rolling_std(values: &[f64], period: usize) -> Channel {
    rolling(values, period, |window| {
        if window.len() < 2 {
            return None;
        }
        let mean = window.iter().sum::<f64>() / window.len() as f64;
        let variance =
            window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window.len() - 1) as f64;
        Some(variance.sqrt())
    })
}

pub fn rolling_max(values: &[f64], period: usize) -> Channel {
    rolling(values, period, |window| {
        Some(window.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    })
}

pub fn rolling_min(values: &[f64], period: usize) -> Channel {
    rolling(values, period, |window| {
        Some(window.iter().copied().fold(f64::INFINITY, f64::min))
    })
}

fn rolling<F>(values: &[f64], period: usize, f: F) -> Channel
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                f(&values[i + 1 - period..=i])
            }
        })
        .collect()
}
