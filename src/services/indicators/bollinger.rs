//! Bollinger Bands indicator.

use super::{rolling_mean, rolling_std, Channel, Indicator, IndicatorFrame};
use crate::types::Bar;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerLines {
    pub upper: Channel,
    pub middle: Channel,
    pub lower: Channel,
}

/// Middle = SMA(period); upper/lower = middle +/- k * sample std.
pub fn bollinger_bands(closes: &[f64], period: usize, k: f64) -> BollingerLines {
    let middle = rolling_mean(closes, period);
    let std = rolling_std(closes, period);

    let band = |sign: f64| -> Channel {
        middle
            .iter()
            .zip(&std)
            .map(|(m, s)| Some(m.as_ref()? + sign * k * s.as_ref()?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerLines {
        upper,
        middle,
        lower,
    }
}

pub struct BollingerBands {
    period: usize,
    k: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self { period: 20, k: 2.0 }
    }
}

impl Indicator for BollingerBands {
    fn id(&self) -> &str {
        "bollinger"
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Option<IndicatorFrame> {
        if bars.len() < self.min_periods() {
            return None;
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let lines = bollinger_bands(&closes, self.period, self.k);
        Some(
            IndicatorFrame::new(bars.len())
                .with_channel("Upper", lines.upper)
                .with_channel("Middle", lines.middle)
                .with_channel("Lower", lines.lower),
        )
    }
}
