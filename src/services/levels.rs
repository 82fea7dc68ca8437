//! Support/resistance level identification.
//!
//! Candidates are bars whose high (low) equals the centered rolling max (min).
//! Each candidate is then clustered against the whole series by price
//! proximity, so nearby candidates yield near-duplicate levels. That is kept
//! as-is: the strength ranking downstream depends on it.

use crate::types::{Bar, Level, LevelSide, Series};

/// At most this many levels survive per side.
pub const MAX_LEVELS: usize = 10;

/// Level clustering policy. Tolerance and touch count belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub side: LevelSide,
    /// Width of the centered extremum window.
    pub window: usize,
    pub min_touches: usize,
    /// Fractional tolerance, e.g. `0.02` for 2%.
    pub tolerance: f64,
}

impl LevelConfig {
    pub fn resistance(min_touches: usize, tolerance: f64) -> Self {
        Self {
            side: LevelSide::Resistance,
            window: 20,
            min_touches,
            tolerance,
        }
    }

    pub fn support(min_touches: usize, tolerance: f64) -> Self {
        Self {
            side: LevelSide::Support,
            window: 20,
            min_touches,
            tolerance,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }
}

/// Identify levels on one side of a series, strongest first.
pub fn identify_levels(series: &Series, config: &LevelConfig) -> Vec<Level> {
    identify_levels_in(series.bars(), config)
}

/// Same as [`identify_levels`] over a raw bar slice.
pub fn identify_levels_in(bars: &[Bar], config: &LevelConfig) -> Vec<Level> {
    let prices: Vec<f64> = match config.side {
        LevelSide::Resistance => bars.iter().map(|b| b.high).collect(),
        LevelSide::Support => bars.iter().map(|b| b.low).collect(),
    };
    let n = prices.len();

    let mut levels: Vec<Level> = local_extrema(&prices, config.window, config.side)
        .into_iter()
        .filter_map(|candidate| cluster(&prices, prices[candidate], config))
        .collect();

    // Stable, so equal strengths keep candidate order.
    levels.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    levels.truncate(MAX_LEVELS);

    tracing::trace!(
        side = ?config.side,
        bars = n,
        levels = levels.len(),
        "Identified levels"
    );
    levels
}

/// Indices whose value equals the centered rolling extreme.
///
/// For window `w` the span around `i` is `[i - w/2, i + (w - 1)/2]`; positions
/// whose span runs off either end of the series are never candidates.
pub fn local_extrema(values: &[f64], window: usize, side: LevelSide) -> Vec<usize> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    let ahead = (window - 1) / 2;
    let behind = window - 1 - ahead;

    (behind..values.len() - ahead)
        .filter(|&i| {
            let span = &values[i - behind..=i + ahead];
            let extreme = match side {
                LevelSide::Resistance => span.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                LevelSide::Support => span.iter().copied().fold(f64::INFINITY, f64::min),
            };
            values[i] == extreme
        })
        .collect()
}

fn cluster(prices: &[f64], candidate: f64, config: &LevelConfig) -> Option<Level> {
    if candidate == 0.0 {
        return None;
    }

    let touches: Vec<usize> = prices
        .iter()
        .enumerate()
        .filter(|(_, &p)| (p - candidate).abs() / candidate <= config.tolerance)
        .map(|(j, _)| j)
        .collect();

    if touches.is_empty() || touches.len() < config.min_touches {
        return None;
    }

    let touch_count = touches.len();
    let first_touch_index = touches[0];
    let last_touch_index = touches[touch_count - 1];
    let price = touches.iter().map(|&j| prices[j]).sum::<f64>() / touch_count as f64;

    Some(Level {
        side: config.side,
        price,
        touch_count,
        first_touch_index,
        last_touch_index,
        strength: level_strength(touch_count, last_touch_index, prices.len())?,
    })
}

/// `touch_count * (1 + (n - last_touch_index) / n)`. Absent for an empty series.
pub fn level_strength(touch_count: usize, last_touch_index: usize, n: usize) -> Option<f64> {
    if n == 0 {
        return None;
    }
    let n = n as f64;
    Some(touch_count as f64 * (1.0 + (n - last_touch_index as f64) / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars_from_highs_lows(points: &[(f64, f64)]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        points
            .iter()
            .enumerate()
            .map(|(i, &(high, low))| Bar {
                time: start + Duration::days(i as i64),
                open: (high + low) / 2.0,
                high,
                low,
                close: (high + low) / 2.0,
                volume: 1_000,
            })
            .collect()
    }

    /// Sawtooth between 90 and 110 with a period of 25 bars.
    fn create_sawtooth_bars(n: usize) -> Vec<Bar> {
        let points: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let phase = (i % 25) as f64;
                let mid = if phase < 12.5 { 90.0 + phase * 1.6 } else { 110.0 - (phase - 12.5) * 1.6 };
                (mid + 1.0, mid - 1.0)
            })
            .collect();
        bars_from_highs_lows(&points)
    }

    #[test]
    fn test_local_extrema_window_bounds() {
        let mut values = vec![1.0; 30];
        values[5] = 9.0; // span would run off the front
        values[15] = 9.0;
        // every in-bounds span [i - 10, i + 9] covers bar 15
        let peaks = local_extrema(&values, 20, LevelSide::Resistance);
        assert_eq!(peaks, vec![15]);
    }

    #[test]
    fn test_local_extrema_short_series() {
        assert!(local_extrema(&[1.0; 19], 20, LevelSide::Support).is_empty());
    }

    #[test]
    fn test_resistance_levels_cluster_peaks() {
        let bars = create_sawtooth_bars(150);
        let levels = identify_levels_in(&bars, &LevelConfig::resistance(3, 0.02));
        assert!(!levels.is_empty(), "sawtooth should produce resistance levels");
        for level in &levels {
            assert_eq!(level.side, LevelSide::Resistance);
            assert!(level.touch_count >= 3);
            assert!(level.price > 105.0, "resistance at {} should sit near the peaks", level.price);
            assert!(level.first_touch_index <= level.last_touch_index);
        }
    }

    #[test]
    fn test_support_levels_cluster_troughs() {
        let bars = create_sawtooth_bars(150);
        let levels = identify_levels_in(&bars, &LevelConfig::support(2, 0.025));
        assert!(!levels.is_empty());
        assert!(levels.iter().all(|l| l.price < 95.0));
    }

    #[test]
    fn test_levels_sorted_and_truncated() {
        let bars = create_sawtooth_bars(400);
        let levels = identify_levels_in(&bars, &LevelConfig::resistance(2, 0.02));
        assert!(levels.len() <= MAX_LEVELS);
        for pair in levels.windows(2) {
            assert!(pair[0].strength >= pair[1].strength);
        }
    }

    #[test]
    fn test_levels_not_deduplicated() {
        // two equal peaks each anchor the same cluster
        let mut points = vec![(101.0, 99.0); 60];
        points[20] = (120.0, 118.0);
        points[40] = (120.0, 118.0);
        let levels = identify_levels_in(&bars_from_highs_lows(&points), &LevelConfig::resistance(2, 0.02));
        let peaks: Vec<&Level> = levels.iter().filter(|l| l.price == 120.0).collect();
        assert_eq!(peaks.len(), 2);
        assert_eq!(peaks[0], peaks[1]);
    }

    #[test]
    fn test_level_price_is_mean_of_touches() {
        let mut points = vec![(100.0, 98.0); 60];
        points[20] = (120.0, 118.0);
        points[30] = (119.0, 117.0);
        points[45] = (121.0, 119.0);
        let levels = identify_levels_in(&bars_from_highs_lows(&points), &LevelConfig::resistance(3, 0.02));
        let level = levels.iter().find(|l| l.price > 110.0).unwrap();
        assert_eq!(level.touch_count, 3);
        assert!((level.price - 120.0).abs() < 1e-9);
        assert_eq!(level.first_touch_index, 20);
        assert_eq!(level.last_touch_index, 45);
    }

    #[test]
    fn test_level_strength_formula() {
        assert_eq!(level_strength(3, 50, 100), Some(4.5));
        assert_eq!(level_strength(3, 0, 100), Some(6.0));
        assert_eq!(level_strength(3, 0, 0), None);
        // older last touches score higher under this formula
        assert!(level_strength(2, 10, 100) > level_strength(2, 90, 100));
    }

    #[test]
    fn test_min_touches_filters_candidates() {
        let mut points = vec![(100.0, 98.0); 60];
        points[30] = (130.0, 128.0);
        let levels = identify_levels_in(&bars_from_highs_lows(&points), &LevelConfig::resistance(2, 0.02));
        assert!(levels.iter().all(|l| l.price != 130.0));
    }
}
