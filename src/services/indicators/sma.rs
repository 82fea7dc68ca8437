//! Simple Moving Average (SMA) indicator.

use super::{rolling_mean, Channel, Indicator, IndicatorFrame};
use crate::types::Bar;

/// Trailing arithmetic mean; the first `period - 1` positions are absent.
pub fn sma(values: &[f64], period: usize) -> Channel {
    rolling_mean(values, period)
}

/// SMA over bar closes.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Sma {
    fn id(&self) -> &str {
        match self.period {
            20 => "sma20",
            50 => "sma50",
            _ => "sma",
        }
    }

    fn name(&self) -> &str {
        match self.period {
            20 => "SMA (20)",
            50 => "SMA (50)",
            _ => "SMA",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Option<IndicatorFrame> {
        if bars.len() < self.min_periods() {
            return None;
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Some(IndicatorFrame::new(bars.len()).with_channel("SMA", sma(&closes, self.period)))
    }
}
