//! Integration tests for the indicator library

use chrono::{Duration, TimeZone, Utc};
use levelscan::services::indicators::{all_indicators, atr, ema, rsi, sma, Macd, MIN_MACD_BARS};
use levelscan::types::{Bar, MacdSignal};

fn create_bars(closes: &[f64]) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            time: start + Duration::days(i as i64),
            open: close,
            high: close + 1.5,
            low: close - 1.5,
            close,
            volume: 25_000,
        })
        .collect()
}

fn create_wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 8.0 * (i as f64 * 0.3).sin() + i as f64 * 0.1)
        .collect()
}

// ===== EMA Tests =====

#[test]
fn test_ema_seed_and_length() {
    let closes = create_wave_closes(75);
    for period in [1, 2, 9, 12, 26, 200] {
        let out = ema(&closes, period);
        assert_eq!(out.len(), closes.len());
        assert_eq!(out[0], closes[0], "period {} seed", period);
    }
}

#[test]
fn test_ema_recursion() {
    let closes = [10.0, 20.0, 30.0];
    let out = ema(&closes, 3);
    // k = 0.5
    assert_eq!(out, vec![10.0, 15.0, 22.5]);
}

// ===== MACD Tests =====

#[test]
fn test_macd_absent_below_minimum() {
    let macd = Macd::default();
    for n in 0..MIN_MACD_BARS {
        let closes = create_wave_closes(n);
        assert!(macd.lines(&closes).is_none(), "{} closes produced MACD", n);
    }
    assert!(macd.lines(&create_wave_closes(MIN_MACD_BARS)).is_some());
}

#[test]
fn test_macd_scalar_and_series_agree() {
    let lines = Macd::default().lines(&create_wave_closes(60)).unwrap();
    let (macd, signal, hist) = lines.latest().unwrap();
    assert_eq!(lines.histogram.len(), 60);
    assert!((hist - (macd - signal)).abs() < 1e-12);
    assert_eq!(lines.latest_histogram(), Some(hist));
}

#[test]
fn test_histogram_turns_before_zero_line_cross() {
    // 40 closes rising 100 -> 140, then a slide to 90
    let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + 40.0 * i as f64 / 39.0).collect();
    closes.extend((1..=20).map(|i| 140.0 - 50.0 * i as f64 / 20.0));

    let lines = Macd::default().lines(&closes).unwrap();
    let categorical = lines.categorical();

    assert_eq!(categorical[39], MacdSignal::StrongBuy);

    let first_negative_hist = (40..closes.len())
        .find(|&i| lines.histogram[i] < 0.0)
        .expect("histogram never turned negative");
    let first_bearish = (40..closes.len())
        .find(|&i| categorical[i].is_bearish())
        .expect("signal never turned bearish");

    assert!(
        first_negative_hist <= first_bearish,
        "histogram flipped at {}, signal at {}",
        first_negative_hist,
        first_bearish
    );
    assert!(categorical[first_bearish - 1].is_bullish());
    // MACD is still above zero when the histogram first flips
    assert_eq!(categorical[first_negative_hist], MacdSignal::WeakSell);
}

// ===== Rolling Indicator Tests =====

#[test]
fn test_atr_warm_up() {
    let bars = create_bars(&create_wave_closes(30));
    let out = atr(&bars, 14);
    assert_eq!(out.len(), 30);
    assert!(out[..13].iter().all(|v| v.is_none()));
    assert!(out[13..].iter().all(|v| v.is_some_and(|x| x >= 3.0)));
}

#[test]
fn test_sma_and_rsi_alignment() {
    let closes = create_wave_closes(40);
    assert_eq!(sma(&closes, 20).len(), 40);
    let rsi = rsi(&closes, 14);
    assert_eq!(rsi.len(), 40);
    assert!(rsi
        .iter()
        .flatten()
        .all(|v| (0.0..=100.0).contains(v)));
}

// ===== Frame Tests =====

#[test]
fn test_all_indicators_align_with_bars() {
    let bars = create_bars(&create_wave_closes(120));
    for indicator in all_indicators() {
        let frame = indicator
            .compute(&bars)
            .unwrap_or_else(|| panic!("{} returned nothing", indicator.id()));
        assert_eq!(frame.len(), bars.len(), "{} frame length", indicator.id());
        for name in frame.names() {
            assert_eq!(frame.channel(name).unwrap().len(), bars.len());
            assert!(frame.latest(name).is_some(), "{}/{} latest", indicator.id(), name);
        }
    }
}

#[test]
fn test_all_indicators_respect_min_periods() {
    for indicator in all_indicators() {
        let short = create_bars(&create_wave_closes(indicator.min_periods().saturating_sub(1)));
        assert!(
            indicator.compute(&short).is_none(),
            "{} computed on {} bars",
            indicator.id(),
            short.len()
        );
    }
}
