//! Signal classifiers.
//!
//! Each scanner turns one [`Series`] into at most one [`SignalRow`]. Scanners
//! hold only their configuration, so the same scanner can classify many
//! symbols concurrently.

pub mod macd;
pub mod range_breakout;
pub mod resistance_breakout;
pub mod support_resistance;

pub use macd::{
    classify_macd, classify_transition, MacdCrossoverConfig, MacdCrossoverScanner,
    MacdMomentumConfig, MacdMomentumScanner, MacdTransition,
};
pub use range_breakout::{classify_breakout, RangeBreakoutConfig, RangeBreakoutScanner};
pub use resistance_breakout::{
    classify_resistance, ResistanceBreakoutConfig, ResistanceBreakoutScanner, ResistanceMatch,
};
pub use support_resistance::{
    analyze_position, PositionAnalysis, SupportResistanceConfig, SupportResistanceScanner,
};

use crate::config::ScannerSettings;
use crate::types::{Granularity, ScannerKind, Series, SignalRow};

/// A single-series classifier.
pub trait Scanner: Send + Sync {
    fn kind(&self) -> ScannerKind;

    /// Granularity of the bars this scanner fetches.
    fn granularity(&self) -> Granularity;

    /// Days of history to request.
    fn lookback_days(&self) -> u32;

    /// Shorter series are skipped, never padded.
    fn min_bars(&self) -> usize;

    /// Classify the series. None means no actionable pattern.
    fn scan_series(&self, series: &Series) -> Option<SignalRow>;
}

/// Build the scanner for `kind` from its settings.
pub fn build_scanner(kind: ScannerKind, settings: &ScannerSettings) -> Box<dyn Scanner> {
    match kind {
        ScannerKind::MacdMomentum => Box::new(MacdMomentumScanner::new(settings.macd.clone())),
        ScannerKind::MacdCrossover => {
            Box::new(MacdCrossoverScanner::new(settings.crossover.clone()))
        }
        ScannerKind::RangeBreakout => Box::new(RangeBreakoutScanner::new(settings.range.clone())),
        ScannerKind::ResistanceBreakout => {
            Box::new(ResistanceBreakoutScanner::new(settings.resistance.clone()))
        }
        ScannerKind::SupportResistance => {
            Box::new(SupportResistanceScanner::new(settings.support.clone()))
        }
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Percentage change from `from` to `to`, absent when `from` is zero.
pub fn pct_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        None
    } else {
        Some((to - from) / from * 100.0)
    }
}
