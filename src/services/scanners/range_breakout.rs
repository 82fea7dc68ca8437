use super::{round_to, Scanner};
use crate::services::ranges::{detect_ranges, RangeConfig};
use crate::types::{Granularity, RangeBreakout, RangeWindow, ScannerKind, Series, SignalDetails, SignalRow};

#[derive(Debug, Clone)]
pub struct RangeBreakoutConfig {
    pub timeframe: Granularity,
    pub lookback_days: u32,
    pub min_bars: usize,
    pub range: RangeConfig,
    /// Proximity (percent of half-width from the middle) above which a close
    /// inside the range counts as near a boundary.
    pub near_boundary_pct: f64,
}

impl Default for RangeBreakoutConfig {
    fn default() -> Self {
        Self {
            timeframe: Granularity::FourHours,
            // NSE sessions give two 4h bars a day
            lookback_days: 120,
            min_bars: 100,
            range: RangeConfig::default(),
            near_boundary_pct: 80.0,
        }
    }
}

/// Classify `current` against a range, with `previous` as the reference close.
///
/// Outcomes are mutually exclusive. A zero-width range yields nothing.
pub fn classify_breakout(
    range: &RangeWindow,
    current: f64,
    previous: f64,
    near_boundary_pct: f64,
) -> Option<(RangeBreakout, f64)> {
    let width = range.top - range.bottom;
    if width <= 0.0 {
        return None;
    }

    let (breakout, strength) = if current > range.top && previous <= range.top {
        (RangeBreakout::UpwardBreakout, ((current - range.top) / width * 100.0).min(100.0))
    } else if current < range.bottom && previous >= range.bottom {
        (RangeBreakout::DownwardBreakout, ((range.bottom - current) / width * 100.0).min(100.0))
    } else if current > range.bottom && current < range.top {
        if current > range.middle {
            let proximity = (current - range.middle) / (range.top - range.middle) * 100.0;
            if proximity <= near_boundary_pct {
                return None;
            }
            (RangeBreakout::NearUpperBoundary, proximity)
        } else {
            let proximity = (range.middle - current) / (range.middle - range.bottom) * 100.0;
            if proximity <= near_boundary_pct {
                return None;
            }
            (RangeBreakout::NearLowerBoundary, proximity)
        }
    } else {
        return None;
    };

    Some((breakout, round_to(strength, 1)))
}

/// Breakouts from the most recent closed range.
pub struct RangeBreakoutScanner {
    config: RangeBreakoutConfig,
}

impl RangeBreakoutScanner {
    pub fn new(config: RangeBreakoutConfig) -> Self {
        Self { config }
    }

    /// Latest detected range, if it has closed before the last bar.
    pub fn latest_closed_range(&self, series: &Series) -> Option<RangeWindow> {
        detect_ranges(series, &self.config.range)
            .pop()
            .filter(|range| range.is_closed(series.len()))
    }
}

impl Default for RangeBreakoutScanner {
    fn default() -> Self {
        Self::new(RangeBreakoutConfig::default())
    }
}

impl Scanner for RangeBreakoutScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::RangeBreakout
    }

    fn granularity(&self) -> Granularity {
        self.config.timeframe
    }

    fn lookback_days(&self) -> u32 {
        self.config.lookback_days
    }

    fn min_bars(&self) -> usize {
        self.config.min_bars
    }

    fn scan_series(&self, series: &Series) -> Option<SignalRow> {
        if series.len() < self.min_bars() {
            return None;
        }

        let range = self.latest_closed_range(series)?;
        let last = series.last()?;
        let (current, previous) = series.last_two_closes()?;

        let (breakout, strength) =
            classify_breakout(&range, current, previous, self.config.near_boundary_pct)?;

        Some(SignalRow {
            symbol: series.symbol.clone(),
            signal_type: breakout.label().to_string(),
            strength,
            current_price: round_to(last.close, 2),
            volume: last.volume,
            timeframe: series.granularity,
            details: SignalDetails::RangeBreakout {
                range_top: round_to(range.top, 2),
                range_bottom: round_to(range.bottom, 2),
                range_width_pct: range.width_pct().map(|w| round_to(w, 2)),
                bars_in_range: range.duration_bars,
            },
        })
    }
}
