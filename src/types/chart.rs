use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Bar granularity supported by the scanners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Granularity {
    /// Get the granularity from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "15m" => Some(Granularity::FifteenMinutes),
            "1h" | "60m" => Some(Granularity::OneHour),
            "4h" => Some(Granularity::FourHours),
            "1d" => Some(Granularity::OneDay),
            _ => None,
        }
    }

    /// Short label used in result rows and cache keys.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::FifteenMinutes => "15m",
            Granularity::OneHour => "1h",
            Granularity::FourHours => "4h",
            Granularity::OneDay => "1d",
        }
    }

    /// Bar length in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Granularity::FifteenMinutes => 900,
            Granularity::OneHour => 3_600,
            Granularity::FourHours => 14_400,
            Granularity::OneDay => 86_400,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Ordered bars for one symbol at one granularity.
///
/// Timestamps are strictly increasing; the constructor rejects anything else
/// rather than re-sorting, so a provider bug surfaces as a skipped symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub symbol: String,
    pub granularity: Granularity,
    bars: Vec<Bar>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, granularity: Granularity, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        if let Some(pos) = bars.windows(2).position(|w| w[1].time <= w[0].time) {
            return Err(AppError::InvalidSeries(format!(
                "{}: timestamp at bar {} does not increase ({} -> {})",
                symbol,
                pos + 1,
                bars[pos].time,
                bars[pos + 1].time
            )));
        }
        Ok(Self {
            symbol,
            granularity,
            bars,
        })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Latest and previous close, if the series has at least two bars.
    pub fn last_two_closes(&self) -> Option<(f64, f64)> {
        let n = self.bars.len();
        if n < 2 {
            return None;
        }
        Some((self.bars[n - 1].close, self.bars[n - 2].close))
    }

    /// Reject series shorter than `required` bars.
    pub fn require(&self, required: usize) -> Result<()> {
        if self.bars.len() < required {
            return Err(AppError::InsufficientData {
                required,
                provided: self.bars.len(),
            });
        }
        Ok(())
    }
}
