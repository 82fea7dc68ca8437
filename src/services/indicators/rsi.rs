//! Relative Strength Index (RSI) indicator.

use super::{rolling_mean_opt, Channel, Indicator, IndicatorFrame};
use crate::types::Bar;

/// RSI with simple rolling means of gains and losses.
///
/// The first bar has no change, so the first value lands at index `period`.
/// A window with no losses reads 100; a window with no movement at all is
/// absent.
pub fn rsi(closes: &[f64], period: usize) -> Channel {
    let changes: Vec<Option<f64>> = std::iter::once(None)
        .chain(closes.windows(2).map(|w| Some(w[1] - w[0])))
        .take(closes.len())
        .collect();
    let gains: Channel = changes.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Channel = changes.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let avg_gain = rolling_mean_opt(&gains, period);
    let avg_loss = rolling_mean_opt(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| {
            let (gain, loss) = (gain?, loss?);
            if loss == 0.0 {
                return if gain == 0.0 { None } else { Some(100.0) };
            }
            let rs = gain / loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        })
        .collect()
}

pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Indicator for Rsi {
    fn id(&self) -> &str {
        "rsi"
    }

    fn name(&self) -> &str {
        "RSI (14)"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn compute(&self, bars: &[Bar]) -> Option<IndicatorFrame> {
        if bars.len() < self.min_periods() {
            return None;
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Some(IndicatorFrame::new(bars.len()).with_channel("RSI", rsi(&closes, self.period)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out[19], Some(100.0));
    }

    #[test]
    fn test_rsi_first_value_after_period_changes() {
        let closes: Vec<f64> = (100..120).map(f64::from).collect();
        let out = rsi(&closes, 14);
        assert_eq!(out.len(), 20);
        assert!(out[..14].iter().all(|v| v.is_none()));
        assert_eq!(out[14], Some(100.0));
    }

    #[test]
    fn test_rsi_empty_input() {
        assert!(rsi(&[], 14).is_empty());
    }

    #[test]
    fn test_rsi_flat_is_absent() {
        let out = rsi(&[100.0; 20], 14);
        assert!(out.iter().all(|v| v.is_none()));
    }

    #[test]
    fn test_rsi_bounds() {
        let closes: Vec<f64> = (0..60)
            .map(|i| {
                let step = if i % 3 == 0 { -2.0 } else { 1.5 };
                100.0 + step * (i % 5) as f64
            })
            .collect();
        for v in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {}", v);
        }
    }

    #[test]
    fn test_rsi_balanced_moves_is_50() {
        let closes: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        // a 14-bar window starting past the first bar holds 7 ups and 7 downs
        let v = rsi(&closes, 14)[20].unwrap();
        assert!((v - 50.0).abs() < 1e-9, "expected 50, got {}", v);
    }
}
