//! Average True Range (ATR) indicator.

use super::{rolling_mean, Channel, Indicator, IndicatorFrame};
use crate::types::Bar;

/// True range per bar.
///
/// TR = max(High - Low, |High - PrevClose|, |Low - PrevClose|). The first bar
/// has no previous close and uses High - Low.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let hl = bar.high - bar.low;
            match i.checked_sub(1).map(|p| bars[p].close) {
                None => hl,
                Some(prev_close) => hl
                    .max((bar.high - prev_close).abs())
                    .max((bar.low - prev_close).abs()),
            }
        })
        .collect()
}

/// Simple rolling mean of true range.
pub fn atr(bars: &[Bar], period: usize) -> Channel {
    rolling_mean(&true_range(bars), period)
}

/// ATR (Average True Range) indicator.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Atr {
    fn id(&self) -> &str {
        "atr"
    }

    fn name(&self) -> &str {
        "ATR (14)"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Option<IndicatorFrame> {
        if bars.len() < self.min_periods() {
            return None;
        }
        Some(IndicatorFrame::new(bars.len()).with_channel("ATR", atr(bars, self.period)))
    }
}
