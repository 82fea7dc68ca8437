//! Batch scan runner.
//!
//! Walks the symbol universe, fetches each series through the rate-limited
//! provider (or the shared cache), and hands it to a scanner. A failure on one
//! symbol is recorded in the report and never aborts the batch.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::cache::{SeriesCache, SeriesKey};
use crate::services::scanners::Scanner;
use crate::sources::{DataProvider, RateLimiter, SymbolUniverse};
use crate::types::{Granularity, ScanReport, Series, SignalRow, SkipReason, SkippedSymbol};

/// What one symbol produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Signal(SignalRow),
    NoSignal,
    Skipped(SkipReason),
}

pub struct ScanOrchestrator {
    provider: Arc<dyn DataProvider>,
    universe: Arc<dyn SymbolUniverse>,
    cache: SeriesCache,
    limiter: RateLimiter,
    symbol_limit: usize,
    max_concurrency: usize,
}

impl ScanOrchestrator {
    pub fn new(
        provider: Arc<dyn DataProvider>,
        universe: Arc<dyn SymbolUniverse>,
        config: &Config,
    ) -> Self {
        Self {
            provider,
            universe,
            cache: SeriesCache::new(config.cache_ttl),
            limiter: RateLimiter::new(config.request_spacing),
            symbol_limit: config.symbol_limit,
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    /// Symbols a scan will visit: universe order, duplicates removed, truncated
    /// to the configured limit.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        for symbol in self.universe.list_symbols() {
            if symbols.len() >= self.symbol_limit {
                break;
            }
            if !symbols.contains(&symbol) {
                symbols.push(symbol);
            }
        }
        symbols
    }

    /// Fetch a series, serving repeats from the cache.
    async fn load_series(
        &self,
        symbol: &str,
        granularity: Granularity,
        lookback_days: u32,
    ) -> Result<Option<Arc<Series>>> {
        let key = SeriesKey::new(symbol, granularity, lookback_days);
        if let Some(series) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(Some(series));
        }

        self.limiter.acquire().await;
        let Some(series) = self.provider.fetch(symbol, lookback_days, granularity).await? else {
            return Ok(None);
        };

        let series = Arc::new(series);
        self.cache.insert(key, Arc::clone(&series));
        Ok(Some(series))
    }

    /// Run one scanner over one symbol.
    pub async fn scan_symbol(&self, scanner: &dyn Scanner, symbol: &str) -> SymbolOutcome {
        let series = match self
            .load_series(symbol, scanner.granularity(), scanner.lookback_days())
            .await
        {
            Ok(Some(series)) if !series.is_empty() => series,
            Ok(_) => {
                debug!("{}: no data", symbol);
                return SymbolOutcome::Skipped(SkipReason::EmptySeries);
            }
            Err(e) => {
                warn!("{}: {} fetch failed: {}", symbol, self.provider.name(), e);
                return SymbolOutcome::Skipped(SkipReason::ProviderFailure {
                    message: e.to_string(),
                });
            }
        };

        if let Err(AppError::InsufficientData { required, provided }) =
            series.require(scanner.min_bars())
        {
            debug!("{}: {} of {} bars required", symbol, provided, required);
            return SymbolOutcome::Skipped(SkipReason::InsufficientData { required, provided });
        }

        match scanner.scan_series(&series) {
            Some(row) => SymbolOutcome::Signal(row),
            None => {
                debug!("{}: no {} signal", symbol, scanner.kind().name());
                SymbolOutcome::NoSignal
            }
        }
    }

    /// Run one scanner over the universe. Rows keep universe order.
    pub async fn run(&self, scanner: &dyn Scanner) -> ScanReport {
        let symbols = self.symbols();
        info!(
            "Running {} scan on {} symbols ({})",
            scanner.kind().name(),
            symbols.len(),
            scanner.granularity()
        );

        let outcomes: Vec<(String, SymbolOutcome)> = stream::iter(symbols)
            .map(|symbol| async move {
                let outcome = self.scan_symbol(scanner, &symbol).await;
                (symbol, outcome)
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut report = ScanReport {
            scanner: scanner.kind(),
            timeframe: scanner.granularity(),
            rows: Vec::new(),
            scanned: outcomes.len(),
            no_signal: 0,
            skipped: Vec::new(),
            timestamp: 0,
        };

        for (symbol, outcome) in outcomes {
            match outcome {
                SymbolOutcome::Signal(row) => report.rows.push(row),
                SymbolOutcome::NoSignal => report.no_signal += 1,
                SymbolOutcome::Skipped(reason) => report.skipped.push(SkippedSymbol { symbol, reason }),
            }
        }
        report.timestamp = chrono::Utc::now().timestamp_millis();

        info!(
            "{} scan complete: {} signals, {} no signal, {} skipped ({} provider failures)",
            scanner.kind().name(),
            report.rows.len(),
            report.no_signal,
            report.skipped_count(),
            report.failed_count()
        );
        report
    }

    /// Run several scanners in sequence, sharing fetched series between them.
    pub async fn run_all(&self, scanners: &[Box<dyn Scanner>]) -> Vec<ScanReport> {
        self.cache.cleanup();
        let mut reports = Vec::with_capacity(scanners.len());
        for scanner in scanners {
            reports.push(self.run(scanner.as_ref()).await);
        }
        reports
    }
}
