//! Resistance breakout, retracement and failed-breakout classification.

use super::{round_to, Scanner};
use crate::services::indicators::volume_sma;
use crate::services::levels::{identify_levels, LevelConfig};
use crate::types::{
    Bar, Granularity, Level, ResistanceSignal, ScannerKind, Series, SignalDetails, SignalRow,
};

#[derive(Debug, Clone)]
pub struct ResistanceBreakoutConfig {
    pub timeframe: Granularity,
    pub lookback_days: u32,
    pub min_bars: usize,
    pub levels: LevelConfig,
    /// A fresh breakout must clear `level * (1 + breakout_tolerance)`.
    pub breakout_tolerance: f64,
    /// Bars in the volume average, current bar included.
    pub volume_window: usize,
    /// Bars searched for the post-breakout high.
    pub retracement_lookback: usize,
    /// Minimum excursion above the level, as a fraction of it.
    pub min_breakout_height: f64,
    /// Current close must sit below `max_high * max_pullback_ratio`.
    pub max_pullback_ratio: f64,
    /// Current close must stay above `level * hold_above_ratio`.
    pub hold_above_ratio: f64,
    pub retracement_min_pct: f64,
    pub retracement_max_pct: f64,
    /// Bars searched for the high of a failed breakout.
    pub failed_lookback: usize,
    pub failed_breakout_ratio: f64,
}

impl Default for ResistanceBreakoutConfig {
    fn default() -> Self {
        Self {
            timeframe: Granularity::FourHours,
            lookback_days: 90,
            min_bars: 100,
            levels: LevelConfig::resistance(3, 0.02),
            breakout_tolerance: 0.01,
            volume_window: 20,
            retracement_lookback: 20,
            min_breakout_height: 0.03,
            max_pullback_ratio: 0.95,
            hold_above_ratio: 1.005,
            retracement_min_pct: 30.0,
            retracement_max_pct: 70.0,
            failed_lookback: 10,
            failed_breakout_ratio: 1.02,
        }
    }
}

/// The first level that matched a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ResistanceMatch {
    pub signal: ResistanceSignal,
    pub level: Level,
    pub strength: f64,
    pub volume_surge: Option<f64>,
    pub retracement_pct: Option<f64>,
    pub max_breakout_price: Option<f64>,
}

impl ResistanceMatch {
    fn new(signal: ResistanceSignal, level: &Level, strength: f64) -> Self {
        Self {
            signal,
            level: level.clone(),
            strength: round_to(strength, 1),
            volume_surge: None,
            retracement_pct: None,
            max_breakout_price: None,
        }
    }
}

/// Walk `levels` in order and return the first matching pattern.
///
/// Per level the checks are exclusive: a close above the level is only ever
/// tested for a fresh breakout or a retracement, and a failed breakout needs
/// the close back at or below it.
pub fn classify_resistance(
    bars: &[Bar],
    levels: &[Level],
    config: &ResistanceBreakoutConfig,
) -> Option<ResistanceMatch> {
    let n = bars.len();
    if n < 2 {
        return None;
    }
    let current = bars[n - 1].close;
    let previous = bars[n - 2].close;

    for level in levels {
        let price = level.price;
        if price <= 0.0 {
            continue;
        }
        let trigger = price + price * config.breakout_tolerance;

        if current > trigger && previous <= trigger {
            let surge = volume_surge(bars, config.volume_window);
            let strength = ((current - price) / price * 100.0 * surge).min(100.0);
            return Some(ResistanceMatch {
                volume_surge: Some(round_to(surge, 2)),
                ..ResistanceMatch::new(ResistanceSignal::FreshBreakout, level, strength)
            });
        } else if current > price {
            let max_high = trailing(bars, config.retracement_lookback)
                .iter()
                .map(|b| b.high)
                .fold(f64::NEG_INFINITY, f64::max);
            let height = max_high - price;

            if height > price * config.min_breakout_height
                && current < max_high * config.max_pullback_ratio
                && current > price * config.hold_above_ratio
            {
                let retracement = (max_high - current) / height * 100.0;
                if retracement >= config.retracement_min_pct
                    && retracement <= config.retracement_max_pct
                {
                    return Some(ResistanceMatch {
                        retracement_pct: Some(round_to(retracement, 1)),
                        max_breakout_price: Some(round_to(max_high, 2)),
                        ..ResistanceMatch::new(
                            ResistanceSignal::RetracementEntry,
                            level,
                            100.0 - retracement,
                        )
                    });
                }
            }
        } else if previous > price && current <= price {
            let broke_out = trailing(bars, config.failed_lookback)
                .iter()
                .any(|b| b.high > price * config.failed_breakout_ratio);
            if broke_out {
                let strength = ((price - current) / price * 100.0).abs();
                return Some(ResistanceMatch::new(
                    ResistanceSignal::FailedBreakout,
                    level,
                    strength,
                ));
            }
        }
    }

    None
}

fn trailing(bars: &[Bar], count: usize) -> &[Bar] {
    &bars[bars.len() - count.min(bars.len())..]
}

/// Current volume over its trailing mean; 1.0 when the mean is missing or not positive.
fn volume_surge(bars: &[Bar], window: usize) -> f64 {
    let volumes: Vec<f64> = trailing(bars, window).iter().map(|b| b.volume as f64).collect();
    let average = volume_sma(&volumes, window).last().copied().flatten();
    match (volumes.last(), average) {
        (Some(&current), Some(average)) if average > 0.0 => current / average,
        _ => 1.0,
    }
}

pub struct ResistanceBreakoutScanner {
    config: ResistanceBreakoutConfig,
}

impl ResistanceBreakoutScanner {
    pub fn new(config: ResistanceBreakoutConfig) -> Self {
        Self { config }
    }
}

impl Default for ResistanceBreakoutScanner {
    fn default() -> Self {
        Self::new(ResistanceBreakoutConfig::default())
    }
}

impl Scanner for ResistanceBreakoutScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::ResistanceBreakout
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

        let levels = identify_levels(series, &self.config.levels);
        let found = classify_resistance(series.bars(), &levels, &self.config)?;
        let last = series.last()?;
        let level = found.level.price;

        Some(SignalRow {
            symbol: series.symbol.clone(),
            signal_type: found.signal.label().to_string(),
            strength: found.strength,
            current_price: round_to(last.close, 2),
            volume: last.volume,
            timeframe: series.granularity,
            details: SignalDetails::ResistanceBreakout {
                resistance_level: round_to(level, 2),
                distance_to_resistance_pct: round_to((last.close - level) / level * 100.0, 2),
                resistance_touches: found.level.touch_count,
                volume_surge: found.volume_surge,
                retracement_pct: found.retracement_pct,
                max_breakout_price: found.max_breakout_price,
            },
        })
    }
}
