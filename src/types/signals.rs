use serde::{Deserialize, Serialize};

use super::Granularity;

/// Per-bar categorical MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacdSignal {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "WEAK BUY")]
    WeakBuy,
    #[serde(rename = "NO SIGNAL")]
    NoSignal,
    #[serde(rename = "WEAK SELL")]
    WeakSell,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "STRONG SELL")]
    StrongSell,
}

impl MacdSignal {
    /// Classify one bar from its MACD and signal line values.
    ///
    /// Rules are checked in order; the first match wins.
    pub fn classify(macd: f64, signal: f64) -> Self {
        if macd > signal && macd > 0.0 && signal > 0.0 {
            MacdSignal::StrongBuy
        } else if macd < signal && macd < 0.0 && signal < 0.0 {
            MacdSignal::StrongSell
        } else if macd > signal && macd < 0.0 {
            MacdSignal::WeakBuy
        } else if macd < signal && macd > 0.0 {
            MacdSignal::WeakSell
        } else if macd > signal {
            MacdSignal::Buy
        } else if macd < signal {
            MacdSignal::Sell
        } else {
            MacdSignal::NoSignal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MacdSignal::StrongBuy => "STRONG BUY",
            MacdSignal::Buy => "BUY",
            MacdSignal::WeakBuy => "WEAK BUY",
            MacdSignal::NoSignal => "NO SIGNAL",
            MacdSignal::WeakSell => "WEAK SELL",
            MacdSignal::Sell => "SELL",
            MacdSignal::StrongSell => "STRONG SELL",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, MacdSignal::StrongBuy | MacdSignal::Buy | MacdSignal::WeakBuy)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, MacdSignal::StrongSell | MacdSignal::Sell | MacdSignal::WeakSell)
    }

    /// Ordinal strength used by the crossover alert (5 down to -1).
    pub fn ordinal_strength(&self) -> i8 {
        match self {
            MacdSignal::StrongBuy => 5,
            MacdSignal::Buy => 4,
            MacdSignal::WeakBuy => 3,
            MacdSignal::NoSignal => 2,
            MacdSignal::WeakSell => 1,
            MacdSignal::Sell => 0,
            MacdSignal::StrongSell => -1,
        }
    }
}

/// Crossover/momentum pattern on the latest MACD bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacdPattern {
    #[serde(rename = "Bullish Crossover")]
    BullishCrossover,
    #[serde(rename = "Bearish Crossover")]
    BearishCrossover,
    #[serde(rename = "Bullish Momentum")]
    BullishMomentum,
    #[serde(rename = "Bearish Momentum")]
    BearishMomentum,
}

impl MacdPattern {
    pub fn label(&self) -> &'static str {
        match self {
            MacdPattern::BullishCrossover => "Bullish Crossover",
            MacdPattern::BearishCrossover => "Bearish Crossover",
            MacdPattern::BullishMomentum => "Bullish Momentum",
            MacdPattern::BearishMomentum => "Bearish Momentum",
        }
    }
}

/// Position of the latest close relative to the last closed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeBreakout {
    #[serde(rename = "Upward Breakout")]
    UpwardBreakout,
    #[serde(rename = "Downward Breakout")]
    DownwardBreakout,
    #[serde(rename = "Near Upper Boundary")]
    NearUpperBoundary,
    #[serde(rename = "Near Lower Boundary")]
    NearLowerBoundary,
}

impl RangeBreakout {
    pub fn label(&self) -> &'static str {
        match self {
            RangeBreakout::UpwardBreakout => "Upward Breakout",
            RangeBreakout::DownwardBreakout => "Downward Breakout",
            RangeBreakout::NearUpperBoundary => "Near Upper Boundary",
            RangeBreakout::NearLowerBoundary => "Near Lower Boundary",
        }
    }
}

/// Breakout pattern against a resistance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResistanceSignal {
    #[serde(rename = "Fresh Breakout")]
    FreshBreakout,
    #[serde(rename = "Retracement Entry")]
    RetracementEntry,
    #[serde(rename = "Failed Breakout")]
    FailedBreakout,
}

impl ResistanceSignal {
    pub fn label(&self) -> &'static str {
        match self {
            ResistanceSignal::FreshBreakout => "Fresh Breakout",
            ResistanceSignal::RetracementEntry => "Retracement Entry",
            ResistanceSignal::FailedBreakout => "Failed Breakout",
        }
    }
}

/// Price position relative to the nearest support and resistance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSignal {
    #[serde(rename = "Near Strong Support")]
    NearStrongSupport,
    #[serde(rename = "Near Strong Resistance")]
    NearStrongResistance,
    #[serde(rename = "Good Risk-Reward Setup")]
    GoodRiskReward,
    #[serde(rename = "Above Resistance")]
    AboveResistance,
    #[serde(rename = "Below Support")]
    BelowSupport,
    #[serde(rename = "Middle Zone")]
    MiddleZone,
}

impl PositionSignal {
    pub fn label(&self) -> &'static str {
        match self {
            PositionSignal::NearStrongSupport => "Near Strong Support",
            PositionSignal::NearStrongResistance => "Near Strong Resistance",
            PositionSignal::GoodRiskReward => "Good Risk-Reward Setup",
            PositionSignal::AboveResistance => "Above Resistance",
            PositionSignal::BelowSupport => "Below Support",
            PositionSignal::MiddleZone => "Middle Zone",
        }
    }
}

/// Which classifier produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScannerKind {
    MacdMomentum,
    MacdCrossover,
    RangeBreakout,
    ResistanceBreakout,
    SupportResistance,
}

impl ScannerKind {
    /// Parse from a command-line name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "macd" | "macd_momentum" => Some(Self::MacdMomentum),
            "crossover" | "macd_crossover" => Some(Self::MacdCrossover),
            "range" | "range_breakout" => Some(Self::RangeBreakout),
            "resistance" | "resistance_breakout" => Some(Self::ResistanceBreakout),
            "support" | "support_resistance" => Some(Self::SupportResistance),
            _ => None,
        }
    }

    pub fn all() -> [ScannerKind; 5] {
        [
            Self::MacdMomentum,
            Self::MacdCrossover,
            Self::RangeBreakout,
            Self::ResistanceBreakout,
            Self::SupportResistance,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::MacdMomentum => "MACD Scanner",
            Self::MacdCrossover => "MACD Crossover Alert",
            Self::RangeBreakout => "Range Breakout Scanner",
            Self::ResistanceBreakout => "Resistance Breakout Scanner",
            Self::SupportResistance => "Support Level Scanner",
        }
    }
}

/// Classifier-specific columns of a signal row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignalDetails {
    #[serde(rename_all = "camelCase")]
    MacdMomentum {
        macd: f64,
        signal_line: f64,
        histogram: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        price_change_pct: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    MacdTransition {
        previous_signal: MacdSignal,
        current_signal: MacdSignal,
        macd: f64,
        signal_line: f64,
        histogram: f64,
        signal_strength: i8,
        confidence: f64,
    },
    #[serde(rename_all = "camelCase")]
    RangeBreakout {
        range_top: f64,
        range_bottom: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        range_width_pct: Option<f64>,
        bars_in_range: usize,
    },
    #[serde(rename_all = "camelCase")]
    ResistanceBreakout {
        resistance_level: f64,
        distance_to_resistance_pct: f64,
        resistance_touches: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        volume_surge: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        retracement_pct: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_breakout_price: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    SupportResistance {
        nearest_support: Option<f64>,
        nearest_resistance: Option<f64>,
        distance_to_support_pct: Option<f64>,
        distance_to_resistance_pct: Option<f64>,
        support_strength: f64,
        resistance_strength: f64,
        risk_reward: Option<f64>,
    },
}

/// One row of a scan result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRow {
    pub symbol: String,
    pub signal_type: String,
    /// 0-100.
    pub strength: f64,
    pub current_price: f64,
    pub volume: u64,
    pub timeframe: Granularity,
    #[serde(flatten)]
    pub details: SignalDetails,
}

/// Why a symbol produced no row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    InsufficientData { required: usize, provided: usize },
    ProviderFailure { message: String },
    EmptySeries,
}

impl SkipReason {
    pub fn label(&self) -> String {
        match self {
            SkipReason::InsufficientData { required, provided } => {
                format!("insufficient data ({} of {} bars)", provided, required)
            }
            SkipReason::ProviderFailure { message } => format!("provider failure: {}", message),
            SkipReason::EmptySeries => "empty series".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSymbol {
    pub symbol: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Result of one classifier over one universe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub scanner: ScannerKind,
    pub timeframe: Granularity,
    /// Rows in discovery order, at most one per symbol.
    pub rows: Vec<SignalRow>,
    pub scanned: usize,
    pub no_signal: usize,
    pub skipped: Vec<SkippedSymbol>,
    /// Unix timestamp (milliseconds) when the scan finished.
    pub timestamp: i64,
}

impl ScanReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn failed_count(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::ProviderFailure { .. }))
            .count()
    }
}
