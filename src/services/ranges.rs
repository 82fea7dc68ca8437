//! Range detection.
//!
//! A range is a run of closes that stays inside `middle +/- ATR * mult`, where
//! `middle` is the mean of the `length` closes before the scan position.

use super::indicators::atr;
use crate::types::{Bar, RangeWindow, Series};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConfig {
    /// Trailing window used for the middle line and the containment check.
    pub length: usize,
    /// Band half-width as a multiple of ATR.
    pub mult: f64,
    pub atr_length: usize,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            length: 20,
            mult: 1.0,
            atr_length: 100,
        }
    }
}

pub fn detect_ranges(series: &Series, config: &RangeConfig) -> Vec<RangeWindow> {
    detect_ranges_in(series.bars(), config)
}

/// Greedy left-to-right range scan over raw bars.
///
/// Windows never overlap: after a window closes at its first violating bar,
/// the next trailing window starts at that bar.
pub fn detect_ranges_in(bars: &[Bar], config: &RangeConfig) -> Vec<RangeWindow> {
    let n = bars.len();
    if config.length == 0 || n < config.length.max(config.atr_length) {
        return Vec::new();
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let atr = atr(bars, config.atr_length);
    let mut ranges = Vec::new();
    let mut i = config.length;

    while i < n {
        let Some(atr_i) = atr[i] else {
            i += 1;
            continue;
        };

        let start = i - config.length;
        let trailing = &closes[start..i];
        let middle = trailing.iter().sum::<f64>() / config.length as f64;
        let half_width = atr_i * config.mult;
        let top = middle + half_width;
        let bottom = middle - half_width;

        if !trailing.iter().all(|c| (c - middle).abs() <= half_width) {
            i += 1;
            continue;
        }

        let mut j = i;
        while j < n && closes[j] >= bottom && closes[j] <= top {
            j += 1;
        }
        let end = j - 1;

        ranges.push(RangeWindow {
            start_index: start,
            end_index: end,
            top,
            bottom,
            middle,
            duration_bars: end + 1 - start,
            atr_at_formation: half_width,
        });

        i = j + config.length;
    }

    tracing::trace!(bars = n, ranges = ranges.len(), "Detected ranges");
    ranges
}
