//! Exponential Moving Average (EMA) indicator.

use super::{Indicator, IndicatorFrame};
use crate::types::Bar;

/// EMA seeded with the first value.
///
/// `out[0] = v[0]`, `out[i] = k * v[i] + (1 - k) * out[i - 1]` with
/// `k = 2 / (period + 1)`. Defined from the first bar, so there is no warm-up.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => k * v + (1.0 - k) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

/// EMA over bar closes.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Ema {
    fn id(&self) -> &str {
        match self.period {
            12 => "ema12",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn name(&self) -> &str {
        match self.period {
            12 => "EMA (12)",
            26 => "EMA (26)",
            _ => "EMA",
        }
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Option<IndicatorFrame> {
        if bars.len() < self.min_periods() {
            return None;
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let values = ema(&closes, self.period).into_iter().map(Some).collect();
        Some(IndicatorFrame::new(bars.len()).with_channel("EMA", values))
    }
}
