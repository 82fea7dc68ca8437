//! Price position relative to support and resistance.

use super::{round_to, Scanner};
use crate::services::levels::{identify_levels, LevelConfig};
use crate::types::{Granularity, Level, PositionSignal, ScannerKind, Series, SignalDetails, SignalRow};

#[derive(Debug, Clone)]
pub struct SupportResistanceConfig {
    pub timeframe: Granularity,
    pub lookback_days: u32,
    pub min_bars: usize,
    pub support: LevelConfig,
    pub resistance: LevelConfig,
    /// Distance (percent of price) that counts as near a level.
    pub near_level_pct: f64,
    /// Level strength that counts as strong.
    pub strong_level: f64,
    pub min_risk_reward: f64,
    pub max_risk_pct: f64,
    /// Both distances above this put price in the middle zone.
    pub middle_zone_pct: f64,
}

impl Default for SupportResistanceConfig {
    fn default() -> Self {
        Self {
            timeframe: Granularity::FourHours,
            lookback_days: 90,
            min_bars: 100,
            support: LevelConfig::support(2, 0.025),
            resistance: LevelConfig::resistance(2, 0.025),
            near_level_pct: 3.0,
            strong_level: 5.0,
            min_risk_reward: 2.0,
            max_risk_pct: 5.0,
            middle_zone_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionAnalysis {
    pub signal: Option<PositionSignal>,
    pub nearest_support: Option<Level>,
    pub nearest_resistance: Option<Level>,
    /// `(price - support) / price * 100`.
    pub distance_to_support_pct: Option<f64>,
    /// `(resistance - price) / price * 100`.
    pub distance_to_resistance_pct: Option<f64>,
    /// `(resistance - price) / (price - support)`, rounded to 2 places.
    pub risk_reward: Option<f64>,
}

impl PositionAnalysis {
    /// Strength of the level that drove the signal, capped at 100.
    pub fn strength(&self) -> f64 {
        let level = match self.signal {
            Some(PositionSignal::NearStrongSupport)
            | Some(PositionSignal::GoodRiskReward)
            | Some(PositionSignal::BelowSupport) => self.nearest_support.as_ref(),
            Some(PositionSignal::NearStrongResistance) | Some(PositionSignal::AboveResistance) => {
                self.nearest_resistance.as_ref()
            }
            Some(PositionSignal::MiddleZone) | None => None,
        };
        level.map_or(0.0, |l| round_to(l.strength.min(100.0), 1))
    }
}

/// Locate price between the level lists and pick a position signal.
///
/// "Nearest" is the first level in the given order on the right side of
/// price, not the closest by distance. Level lists arrive strongest first.
pub fn analyze_position(
    price: f64,
    supports: &[Level],
    resistances: &[Level],
    config: &SupportResistanceConfig,
) -> PositionAnalysis {
    let nearest_support = supports.iter().find(|l| l.price < price).cloned();
    let nearest_resistance = resistances.iter().find(|l| l.price > price).cloned();

    let distance = |delta: f64| (price != 0.0).then(|| delta / price * 100.0);
    let distance_to_support_pct = nearest_support.as_ref().and_then(|s| distance(price - s.price));
    let distance_to_resistance_pct =
        nearest_resistance.as_ref().and_then(|r| distance(r.price - price));

    let risk_reward = match (&nearest_support, &nearest_resistance) {
        (Some(s), Some(r)) => {
            let risk = price - s.price;
            let reward = r.price - price;
            (risk > 0.0).then(|| round_to(reward / risk, 2))
        }
        _ => None,
    };

    let mut analysis = PositionAnalysis {
        signal: None,
        nearest_support,
        nearest_resistance,
        distance_to_support_pct,
        distance_to_resistance_pct,
        risk_reward,
    };
    analysis.signal = determine_signal(&analysis, config);
    analysis
}

/// Rules in priority order; the first match wins.
fn determine_signal(analysis: &PositionAnalysis, config: &SupportResistanceConfig) -> Option<PositionSignal> {
    let support = analysis
        .nearest_support
        .as_ref()
        .zip(analysis.distance_to_support_pct);
    let resistance = analysis
        .nearest_resistance
        .as_ref()
        .zip(analysis.distance_to_resistance_pct);

    if let Some((level, dist)) = support {
        if dist <= config.near_level_pct && level.strength >= config.strong_level {
            return Some(PositionSignal::NearStrongSupport);
        }
    }
    if let Some((level, dist)) = resistance {
        if dist <= config.near_level_pct && level.strength >= config.strong_level {
            return Some(PositionSignal::NearStrongResistance);
        }
    }

    let risk = support.map(|(_, d)| d);
    let reward = resistance.map(|(_, d)| d);

    if let (Some(risk), Some(reward)) = (risk, reward) {
        if risk > 0.0 && reward / risk >= config.min_risk_reward && risk <= config.max_risk_pct {
            return Some(PositionSignal::GoodRiskReward);
        }
    }
    if reward.is_some_and(|d| d < 0.0) {
        return Some(PositionSignal::AboveResistance);
    }
    if risk.is_some_and(|d| d < 0.0) {
        return Some(PositionSignal::BelowSupport);
    }
    if let (Some(risk), Some(reward)) = (risk, reward) {
        if risk > config.middle_zone_pct && reward > config.middle_zone_pct {
            return Some(PositionSignal::MiddleZone);
        }
    }
    None
}

pub struct SupportResistanceScanner {
    config: SupportResistanceConfig,
}

impl SupportResistanceScanner {
    pub fn new(config: SupportResistanceConfig) -> Self {
        Self { config }
    }
}

impl Default for SupportResistanceScanner {
    fn default() -> Self {
        Self::new(SupportResistanceConfig::default())
    }
}

impl Scanner for SupportResistanceScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::SupportResistance
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

        let last = series.last()?;
        let supports = identify_levels(series, &self.config.support);
        let resistances = identify_levels(series, &self.config.resistance);
        let analysis = analyze_position(last.close, &supports, &resistances, &self.config);
        let signal = analysis.signal?;

        let round2 = |v: Option<f64>| v.map(|x| round_to(x, 2));
        let level_strength = |l: &Option<Level>| l.as_ref().map_or(0.0, |l| round_to(l.strength, 1));

        Some(SignalRow {
            symbol: series.symbol.clone(),
            signal_type: signal.label().to_string(),
            strength: analysis.strength(),
            current_price: round_to(last.close, 2),
            volume: last.volume,
            timeframe: series.granularity,
            details: SignalDetails::SupportResistance {
                nearest_support: round2(analysis.nearest_support.as_ref().map(|l| l.price)),
                nearest_resistance: round2(analysis.nearest_resistance.as_ref().map(|l| l.price)),
                distance_to_support_pct: round2(analysis.distance_to_support_pct),
                distance_to_resistance_pct: round2(analysis.distance_to_resistance_pct),
                support_strength: level_strength(&analysis.nearest_support),
                resistance_strength: level_strength(&analysis.nearest_resistance),
                risk_reward: analysis.risk_reward,
            },
        })
    }
}
