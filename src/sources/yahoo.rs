//! Yahoo Finance chart API client for historical OHLCV data.
//!
//! Uses the unofficial v8 chart endpoint. Yahoo has no 4-hour interval, so
//! 4h series are built from hourly bars bucketed on exchange-local time.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{DataProvider, ProviderFuture};
use crate::config::YahooConfig;
use crate::error::{AppError, Result};
use crate::services::aggregate::resample;
use crate::types::{Bar, Granularity, Series};

/// UTC offset used when the response omits `gmtoffset` (IST, UTC+05:30).
const DEFAULT_GMT_OFFSET: i64 = 19_800;

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    meta: YahooMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooMeta {
    #[allow(dead_code)]
    symbol: Option<String>,
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Yahoo interval to request for a granularity.
fn interval_for(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::FifteenMinutes => "15m",
        Granularity::OneHour | Granularity::FourHours => "60m",
        Granularity::OneDay => "1d",
    }
}

fn field(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Turn a decoded chart response into a series.
///
/// A bar with any missing price is dropped; missing volume counts as zero.
/// Bars that do not move time forward are dropped, which removes the live
/// bar Yahoo repeats at the end of intraday responses.
fn build_series(
    symbol: &str,
    granularity: Granularity,
    response: YahooChartResponse,
) -> Result<Option<Series>> {
    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            debug!("{}: not found on Yahoo ({})", symbol, error.description);
            return Ok(None);
        }
        return Err(AppError::Provider(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(None);
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(None);
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            field(&opens, i),
            field(&highs, i),
            field(&lows, i),
            field(&closes, i),
        ) else {
            continue;
        };
        let Some(time) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
            continue;
        };
        if bars.last().is_some_and(|prev| time <= prev.time) {
            continue;
        }

        bars.push(Bar {
            time,
            open,
            high,
            low,
            close,
            volume: volumes.get(i).copied().flatten().unwrap_or(0),
        });
    }

    if granularity == Granularity::FourHours {
        let offset = result.meta.gmtoffset.unwrap_or(DEFAULT_GMT_OFFSET);
        bars = resample(&bars, Granularity::FourHours, offset);
    }

    if bars.is_empty() {
        return Ok(None);
    }
    Series::new(symbol, granularity, bars).map(Some)
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    pub fn new(config: &YahooConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str, lookback_days: u32, granularity: Granularity) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}d&interval={}&includePrePost=false",
            self.base_url,
            symbol,
            lookback_days,
            interval_for(granularity)
        )
    }

    /// Fetch `lookback_days` of history for a symbol (e.g. "TCS.NS").
    pub async fn get_series(
        &self,
        symbol: &str,
        lookback_days: u32,
        granularity: Granularity,
    ) -> Result<Option<Series>> {
        let url = self.chart_url(symbol, lookback_days, granularity);
        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        // Unknown symbols come back as 404 with a chart error body.
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(AppError::Provider(format!("API error: {}", status)));
        }

        let body = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&body)?;
        build_series(symbol, granularity, data)
    }
}

impl DataProvider for YahooFinanceClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch<'a>(
        &'a self,
        symbol: &'a str,
        lookback_days: u32,
        granularity: Granularity,
    ) -> ProviderFuture<'a> {
        Box::pin(self.get_series(symbol, lookback_days, granularity))
    }
}
