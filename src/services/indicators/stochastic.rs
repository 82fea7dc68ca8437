//! Stochastic Oscillator indicator.

use super::{rolling_max, rolling_mean_opt, rolling_min, Channel, Indicator, IndicatorFrame};
use crate::types::Bar;

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticLines {
    pub k: Channel,
    pub d: Channel,
}

/// %K = 100 * (close - lowest low) / (highest high - lowest low) over `k_period`;
/// %D = SMA(%K, `d_period`).
///
/// A window with zero high-low range leaves %K absent, and %D is absent
/// whenever any %K in its window is.
pub fn stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> StochasticLines {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let highest = rolling_max(&highs, k_period);
    let lowest = rolling_min(&lows, k_period);

    let k: Channel = bars
        .iter()
        .zip(highest.iter().zip(&lowest))
        .map(|(bar, (hh, ll))| {
            let (hh, ll) = ((*hh)?, (*ll)?);
            let range = hh - ll;
            if range == 0.0 {
                None
            } else {
                Some(100.0 * (bar.close - ll) / range)
            }
        })
        .collect();
    let d = rolling_mean_opt(&k, d_period);

    StochasticLines { k, d }
}

pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

impl Indicator for Stochastic {
    fn id(&self) -> &str {
        "stochastic"
    }

    fn name(&self) -> &str {
        "Stochastic (14,3)"
    }

    fn min_periods(&self) -> usize {
        self.k_period
    }

    fn compute(&self, bars: &[Bar]) -> Option<IndicatorFrame> {
        if bars.len() < self.min_periods() {
            return None;
        }
        let lines = stochastic(bars, self.k_period, self.d_period);
        Some(
            IndicatorFrame::new(bars.len())
                .with_channel("%K", lines.k)
                .with_channel("%D", lines.d),
        )
    }
}
