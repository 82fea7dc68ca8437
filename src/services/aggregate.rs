//! Bar aggregation.

use chrono::{DateTime, Utc};

use crate::types::{Bar, Granularity};

/// Fold ordered bars into non-overlapping buckets of `target`.
///
/// Buckets are aligned to local midnight for `utc_offset_secs`, so 4h buckets
/// on an exchange at UTC+05:30 start at 00:00, 04:00, 08:00 local. Open is the
/// first bar's open, close the last bar's close, high/low the extremes, volume
/// the sum. Buckets with no bars are never produced.
pub fn resample(bars: &[Bar], target: Granularity, utc_offset_secs: i64) -> Vec<Bar> {
    let width = target.seconds();
    let mut out: Vec<Bar> = Vec::new();
    let mut current_bucket: Option<i64> = None;

    for bar in bars {
        let local = bar.time.timestamp() + utc_offset_secs;
        let bucket = local.div_euclid(width) * width - utc_offset_secs;

        match (current_bucket, out.last_mut()) {
            (Some(b), Some(agg)) if b == bucket => {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume = agg.volume.saturating_add(bar.volume);
            }
            _ => {
                let Some(time) = DateTime::<Utc>::from_timestamp(bucket, 0) else {
                    continue;
                };
                out.push(Bar {
                    time,
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                });
                current_bucket = Some(bucket);
            }
        }
    }

    out
}
