use serde::{Deserialize, Serialize};

/// Which side of price a level sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSide {
    /// Clustered troughs, measured on bar lows.
    Support,
    /// Clustered peaks, measured on bar highs.
    Resistance,
}

/// A support or resistance level derived from clustered extrema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub side: LevelSide,
    /// Mean of every touching price.
    pub price: f64,
    pub touch_count: usize,
    pub first_touch_index: usize,
    pub last_touch_index: usize,
    /// `touch_count * (1 + (n - last_touch_index) / n)`.
    pub strength: f64,
}

/// A window where closes stayed inside an ATR band around their mean.
///
/// `start_index..=end_index` are the bars contained in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeWindow {
    pub start_index: usize,
    pub end_index: usize,
    pub top: f64,
    pub bottom: f64,
    pub middle: f64,
    pub duration_bars: usize,
    /// Band half-width (ATR times multiplier) at formation.
    pub atr_at_formation: f64,
}

impl RangeWindow {
    /// Range width as a percentage of the bottom.
    pub fn width_pct(&self) -> Option<f64> {
        if self.bottom == 0.0 {
            return None;
        }
        Some((self.top - self.bottom) / self.bottom * 100.0)
    }

    /// Whether the window ends before `series_len - 1`, i.e. some later bar broke out of it.
    pub fn is_closed(&self, series_len: usize) -> bool {
        self.end_index + 1 < series_len
    }
}
