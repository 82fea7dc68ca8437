use super::{rolling_mean, Channel};

/// Trailing mean of volume over `period` bars, including the current bar.
pub fn volume_sma(volumes: &[f64], period: usize) -> Channel {
    rolling_mean(volumes, period)
}
