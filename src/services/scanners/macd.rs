//! MACD classifiers.
//!
//! Two scanners share the MACD lines: the momentum scanner grades crossover
//! and momentum patterns on the latest bar, and the crossover alert flags a
//! bearish-to-bullish change of the categorical signal.

use super::{pct_change, round_to, Scanner};
use crate::services::indicators::{Macd, MacdLines, MIN_MACD_BARS};
use crate::types::{Granularity, MacdPattern, MacdSignal, ScannerKind, Series, SignalDetails, SignalRow};

#[derive(Debug, Clone)]
pub struct MacdMomentumConfig {
    pub timeframe: Granularity,
    pub lookback_days: u32,
    pub min_bars: usize,
    pub macd: Macd,
}

impl Default for MacdMomentumConfig {
    fn default() -> Self {
        Self {
            timeframe: Granularity::FifteenMinutes,
            lookback_days: 30,
            min_bars: 50,
            macd: Macd::default(),
        }
    }
}

/// Crossover/momentum pattern on the last two bars, with its strength.
///
/// A crossover needs both the MACD/signal cross and the histogram sign
/// change. Momentum needs a same-signed histogram growing away from zero.
pub fn classify_macd(lines: &MacdLines) -> Option<(MacdPattern, f64)> {
    let last = lines.len().checked_sub(1)?;
    let (macd, signal, hist) = lines.at(last)?;
    let (prev_macd, prev_signal, prev_hist) = lines.at(last.checked_sub(1)?)?;

    let (pattern, strength) =
        if macd > signal && prev_macd <= prev_signal && hist > 0.0 && prev_hist <= 0.0 {
            (MacdPattern::BullishCrossover, hist.abs() * 10.0)
        } else if macd < signal && prev_macd >= prev_signal && hist < 0.0 && prev_hist >= 0.0 {
            (MacdPattern::BearishCrossover, hist.abs() * 10.0)
        } else if macd > signal && hist > prev_hist && prev_hist > 0.0 {
            (MacdPattern::BullishMomentum, (hist - prev_hist).abs() * 20.0)
        } else if macd < signal && hist < prev_hist && prev_hist < 0.0 {
            (MacdPattern::BearishMomentum, (hist - prev_hist).abs() * 20.0)
        } else {
            return None;
        };

    Some((pattern, round_to(strength.min(100.0), 1)))
}

/// MACD crossover and momentum scanner.
pub struct MacdMomentumScanner {
    config: MacdMomentumConfig,
}

impl MacdMomentumScanner {
    pub fn new(config: MacdMomentumConfig) -> Self {
        Self { config }
    }
}

impl Default for MacdMomentumScanner {
    fn default() -> Self {
        Self::new(MacdMomentumConfig::default())
    }
}

impl Scanner for MacdMomentumScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::MacdMomentum
    }

    fn granularity(&self) -> Granularity {
        self.config.timeframe
    }

    fn lookback_days(&self) -> u32 {
        self.config.lookback_days
    }

    fn min_bars(&self) -> usize {
        self.config.min_bars.max(MIN_MACD_BARS)
    }

    fn scan_series(&self, series: &Series) -> Option<SignalRow> {
        if series.len() < self.min_bars() {
            return None;
        }

        let lines = self.config.macd.lines(&series.closes())?;
        let (pattern, strength) = classify_macd(&lines)?;
        let (macd, signal_line, histogram) = lines.latest()?;
        let (current, previous) = series.last_two_closes()?;

        Some(SignalRow {
            symbol: series.symbol.clone(),
            signal_type: pattern.label().to_string(),
            strength,
            current_price: round_to(current, 2),
            volume: series.last()?.volume,
            timeframe: series.granularity,
            details: SignalDetails::MacdMomentum {
                macd: round_to(macd, 4),
                signal_line: round_to(signal_line, 4),
                histogram: round_to(histogram, 4),
                price_change_pct: pct_change(previous, current).map(|p| round_to(p, 2)),
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct MacdCrossoverConfig {
    /// Requested timeframe. Anything other than 4h is scanned on daily bars.
    pub timeframe: Granularity,
    pub min_bars: usize,
    pub macd: Macd,
}

impl Default for MacdCrossoverConfig {
    fn default() -> Self {
        Self {
            timeframe: Granularity::OneDay,
            min_bars: MIN_MACD_BARS,
            macd: Macd::default(),
        }
    }
}

impl MacdCrossoverConfig {
    /// Granularity and lookback actually fetched for the requested timeframe.
    pub fn fetch_plan(&self) -> (Granularity, u32) {
        match self.timeframe {
            Granularity::FourHours => (Granularity::FourHours, 60),
            _ => (Granularity::OneDay, 90),
        }
    }
}

/// A bearish-to-bullish change of the categorical MACD signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdTransition {
    pub previous: MacdSignal,
    pub current: MacdSignal,
}

impl MacdTransition {
    pub fn signal_strength(&self) -> i8 {
        self.current.ordinal_strength()
    }

    /// Ordinal strength scaled to 0-1.
    pub fn confidence(&self) -> f64 {
        self.signal_strength() as f64 / 5.0
    }
}

pub fn classify_transition(lines: &MacdLines) -> Option<MacdTransition> {
    let last = lines.len().checked_sub(1)?;
    let (macd, signal, _) = lines.at(last)?;
    let (prev_macd, prev_signal, _) = lines.at(last.checked_sub(1)?)?;

    let previous = MacdSignal::classify(prev_macd, prev_signal);
    let current = MacdSignal::classify(macd, signal);

    (previous.is_bearish() && current.is_bullish()).then_some(MacdTransition { previous, current })
}

/// Bearish-to-bullish crossover alert.
pub struct MacdCrossoverScanner {
    config: MacdCrossoverConfig,
}

impl MacdCrossoverScanner {
    pub fn new(config: MacdCrossoverConfig) -> Self {
        Self { config }
    }
}

impl Default for MacdCrossoverScanner {
    fn default() -> Self {
        Self::new(MacdCrossoverConfig::default())
    }
}

impl Scanner for MacdCrossoverScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::MacdCrossover
    }

    fn granularity(&self) -> Granularity {
        self.config.fetch_plan().0
    }

    fn lookback_days(&self) -> u32 {
        self.config.fetch_plan().1
    }

    fn min_bars(&self) -> usize {
        self.config.min_bars.max(MIN_MACD_BARS)
    }

    fn scan_series(&self, series: &Series) -> Option<SignalRow> {
        if series.len() < self.min_bars() {
            return None;
        }

        let lines = self.config.macd.lines(&series.closes())?;
        let transition = classify_transition(&lines)?;
        let (macd, signal_line, _) = lines.latest()?;
        let histogram = lines.latest_histogram()?;
        let last = series.last()?;

        let symbol = series
            .symbol
            .strip_suffix(".NS")
            .unwrap_or(&series.symbol)
            .to_string();

        Some(SignalRow {
            symbol,
            signal_type: MacdPattern::BullishCrossover.label().to_string(),
            strength: round_to(transition.confidence() * 100.0, 1),
            current_price: round_to(last.close, 2),
            volume: last.volume,
            timeframe: series.granularity,
            details: SignalDetails::MacdTransition {
                previous_signal: transition.previous,
                current_signal: transition.current,
                macd: round_to(macd, 4),
                signal_line: round_to(signal_line, 4),
                histogram: round_to(histogram, 4),
                signal_strength: transition.signal_strength(),
                confidence: transition.confidence(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scanners::test_support::series_from_closes;

    fn lines_from(macd: Vec<f64>, signal: Vec<f64>) -> MacdLines {
        let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();
        MacdLines {
            macd,
            signal,
            histogram,
        }
    }

    #[test]
    fn test_bullish_crossover() {
        let lines = lines_from(vec![-0.5, 1.0], vec![0.0, 0.5]);
        let (pattern, strength) = classify_macd(&lines).unwrap();
        assert_eq!(pattern, MacdPattern::BullishCrossover);
        assert_eq!(strength, 5.0);
    }

    #[test]
    fn test_bearish_crossover() {
        let lines = lines_from(vec![1.0, -1.0], vec![0.5, 2.0]);
        let (pattern, strength) = classify_macd(&lines).unwrap();
        assert_eq!(pattern, MacdPattern::BearishCrossover);
        assert_eq!(strength, 30.0);
    }

    #[test]
    fn test_crossover_strength_capped() {
        let lines = lines_from(vec![-1.0, 30.0], vec![0.0, 10.0]);
        assert_eq!(classify_macd(&lines).unwrap().1, 100.0);
    }

    #[test]
    fn test_bullish_momentum() {
        let lines = lines_from(vec![1.0, 2.0], vec![0.5, 1.0]);
        let (pattern, strength) = classify_macd(&lines).unwrap();
        assert_eq!(pattern, MacdPattern::BullishMomentum);
        assert_eq!(strength, 10.0);
    }

    #[test]
    fn test_bearish_momentum() {
        let lines = lines_from(vec![-1.0, -2.0], vec![-0.5, -1.0]);
        assert_eq!(classify_macd(&lines).unwrap().0, MacdPattern::BearishMomentum);
    }

    #[test]
    fn test_fading_momentum_is_no_signal() {
        let lines = lines_from(vec![2.0, 1.5], vec![1.0, 1.0]);
        assert!(classify_macd(&lines).is_none());
    }

    #[test]
    fn test_single_bar_is_no_signal() {
        let lines = lines_from(vec![1.0], vec![0.0]);
        assert!(classify_macd(&lines).is_none());
        assert!(classify_transition(&lines).is_none());
    }

    #[test]
    fn test_transition_requires_bearish_then_bullish() {
        let lines = lines_from(vec![-1.0, -0.2], vec![-0.5, -0.4]);
        let transition = classify_transition(&lines).unwrap();
        assert_eq!(transition.previous, MacdSignal::StrongSell);
        assert_eq!(transition.current, MacdSignal::WeakBuy);
        assert_eq!(transition.signal_strength(), 3);
        assert!((transition.confidence() - 0.6).abs() < 1e-12);

        let still_bullish = lines_from(vec![1.0, 1.2], vec![0.5, 0.6]);
        assert!(classify_transition(&still_bullish).is_none());
    }

    #[test]
    fn test_momentum_scanner_rejects_short_series() {
        let closes: Vec<f64> = (0..49).map(|i| 100.0 + i as f64).collect();
        let series = series_from_closes("TEST.NS", Granularity::FifteenMinutes, &closes, 1.0);
        assert!(MacdMomentumScanner::default().scan_series(&series).is_none());
    }

    #[test]
    fn test_momentum_scanner_row() {
        // compounding rise keeps the histogram growing
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.03f64.powi(i)).collect();
        let series = series_from_closes("TEST.NS", Granularity::FifteenMinutes, &closes, 1.0);
        let row = MacdMomentumScanner::default().scan_series(&series).unwrap();
        assert_eq!(row.signal_type, "Bullish Momentum");
        assert_eq!(row.symbol, "TEST.NS");
        assert_eq!(row.timeframe, Granularity::FifteenMinutes);
        assert!(row.strength > 0.0 && row.strength <= 100.0);
        match row.details {
            SignalDetails::MacdMomentum { price_change_pct, .. } => {
                assert!(price_change_pct.unwrap() > 0.0)
            }
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_crossover_fetch_plan() {
        let daily = MacdCrossoverConfig::default();
        assert_eq!(daily.fetch_plan(), (Granularity::OneDay, 90));

        let fifteen = MacdCrossoverConfig {
            timeframe: Granularity::FifteenMinutes,
            ..Default::default()
        };
        assert_eq!(fifteen.fetch_plan(), (Granularity::OneDay, 90));

        let four = MacdCrossoverConfig {
            timeframe: Granularity::FourHours,
            ..Default::default()
        };
        assert_eq!(four.fetch_plan(), (Granularity::FourHours, 60));
    }

    #[test]
    fn test_crossover_scanner_strips_exchange_suffix() {
        // fall then recover until the categorical signal turns bullish
        let mut closes: Vec<f64> = (0..30).map(|i| 150.0 - i as f64).collect();
        let scanner = MacdCrossoverScanner::default();
        let mut row = None;
        for step in 0..30 {
            closes.push(121.0 + step as f64 * 3.0);
            let series = series_from_closes("INFY.NS", Granularity::OneDay, &closes, 1.0);
            if let Some(found) = scanner.scan_series(&series) {
                row = Some(found);
                break;
            }
        }
        let row = row.expect("recovery should flip the MACD signal bullish");
        assert_eq!(row.symbol, "INFY");
        assert_eq!(row.signal_type, "Bullish Crossover");
        match row.details {
            SignalDetails::MacdTransition {
                previous_signal,
                current_signal,
                signal_strength,
                ..
            } => {
                assert!(previous_signal.is_bearish());
                assert!(current_signal.is_bullish());
                assert!((3..=5).contains(&signal_strength));
            }
            other => panic!("unexpected details {:?}", other),
        }
    }
}
