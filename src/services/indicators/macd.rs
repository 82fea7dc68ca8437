//! Moving Average Convergence Divergence (MACD) indicator.

use super::{ema, Channel, Indicator, IndicatorFrame};
use crate::types::{Bar, MacdSignal};

/// Fewer closes than this yields no MACD at all.
pub const MIN_MACD_BARS: usize = 30;

/// MACD = EMA(fast) - EMA(slow); signal = EMA(MACD, signal); histogram = MACD - signal.
///
/// Both EMAs are seeded from the first close, so every position is defined
/// once the series clears [`MIN_MACD_BARS`].
#[derive(Debug, Clone, Copy)]
pub struct Macd {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// Aligned MACD output.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdLines {
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    /// `(macd, signal, histogram)` at `index`.
    pub fn at(&self, index: usize) -> Option<(f64, f64, f64)> {
        Some((
            *self.macd.get(index)?,
            *self.signal.get(index)?,
            *self.histogram.get(index)?,
        ))
    }

    pub fn latest(&self) -> Option<(f64, f64, f64)> {
        self.at(self.len().checked_sub(1)?)
    }

    pub fn latest_histogram(&self) -> Option<f64> {
        self.histogram.last().copied()
    }

    /// Categorical signal per bar.
    pub fn categorical(&self) -> Vec<MacdSignal> {
        self.macd
            .iter()
            .zip(&self.signal)
            .map(|(&m, &s)| MacdSignal::classify(m, s))
            .collect()
    }
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self { fast, slow, signal }
    }

    /// Compute all three lines. Returns None below [`MIN_MACD_BARS`].
    pub fn lines(&self, closes: &[f64]) -> Option<MacdLines> {
        if closes.len() < MIN_MACD_BARS {
            return None;
        }

        let fast = ema(closes, self.fast);
        let slow = ema(closes, self.slow);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema(&macd, self.signal);
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        Some(MacdLines {
            macd,
            signal,
            histogram,
        })
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> &str {
        "MACD (12,26,9)"
    }

    fn min_periods(&self) -> usize {
        MIN_MACD_BARS
    }

    fn compute(&self, bars: &[Bar]) -> Option<IndicatorFrame> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let lines = self.lines(&closes)?;
        let wrap = |v: Vec<f64>| -> Channel { v.into_iter().map(Some).collect() };

        Some(
            IndicatorFrame::new(bars.len())
                .with_channel("MACD", wrap(lines.macd))
                .with_channel("Signal", wrap(lines.signal))
                .with_channel("Histogram", wrap(lines.histogram)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_uptrend_closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 2.0).collect()
    }

    fn create_downtrend_closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 200.0 - i as f64 * 2.0).collect()
    }

    #[test]
    fn test_macd_requires_thirty_closes() {
        assert!(Macd::default().lines(&create_uptrend_closes(29)).is_none());
        assert!(Macd::default().lines(&create_uptrend_closes(30)).is_some());
    }

    #[test]
    fn test_macd_lines_are_aligned() {
        let lines = Macd::default().lines(&create_uptrend_closes(60)).unwrap();
        assert_eq!(lines.macd.len(), 60);
        assert_eq!(lines.signal.len(), 60);
        assert_eq!(lines.histogram.len(), 60);
        for i in 0..60 {
            assert!((lines.histogram[i] - (lines.macd[i] - lines.signal[i])).abs() < 1e-12);
        }
    }

    #[test]
    fn test_macd_constant_series_is_zero() {
        let lines = Macd::default().lines(&[50.0; 40]).unwrap();
        assert!(lines.macd.iter().all(|v| v.abs() < 1e-9));
        assert!(lines.histogram.iter().all(|v| v.abs() < 1e-9));
    }

    #[test]
    fn test_macd_uptrend_is_positive() {
        let lines = Macd::default().lines(&create_uptrend_closes(60)).unwrap();
        let (macd, _, _) = lines.latest().unwrap();
        assert!(macd > 0.0, "Uptrend MACD should be positive, got {}", macd);
        assert!(lines.categorical().last().unwrap().is_bullish());
    }

    #[test]
    fn test_macd_downtrend_is_negative() {
        let lines = Macd::default().lines(&create_downtrend_closes(60)).unwrap();
        let (macd, _, _) = lines.latest().unwrap();
        assert!(macd < 0.0, "Downtrend MACD should be negative, got {}", macd);
        assert!(lines.categorical().last().unwrap().is_bearish());
    }

    #[test]
    fn test_macd_first_value_is_zero() {
        // both EMAs seed from the first close
        let lines = Macd::default().lines(&create_uptrend_closes(30)).unwrap();
        assert_eq!(lines.at(0), Some((0.0, 0.0, 0.0)));
    }
}
