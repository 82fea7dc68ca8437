use levelscan::config::Config;
use levelscan::services::{build_scanner, ScanOrchestrator, Scanner};
use levelscan::sources::{DataProvider, StaticUniverse, SymbolUniverse, YahooFinanceClient};
use levelscan::types::ScannerKind;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: levelscan [macd|crossover|range|resistance|support|all]";

/// Scanner kinds selected by the command-line argument.
fn selected_kinds(arg: Option<&str>) -> Option<Vec<ScannerKind>> {
    match arg.unwrap_or("all") {
        "all" => Some(ScannerKind::all().to_vec()),
        other => ScannerKind::from_str(other).map(|kind| vec![kind]),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "levelscan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let arg = std::env::args().nth(1);
    let Some(kinds) = selected_kinds(arg.as_deref()) else {
        error!("Unknown scanner {:?}", arg);
        anyhow::bail!(USAGE);
    };

    let config = Config::from_env();
    let universe: Arc<dyn SymbolUniverse> = match &config.symbols {
        Some(symbols) => Arc::new(StaticUniverse::from_symbols(symbols.iter().cloned())),
        None => Arc::new(StaticUniverse::nse()),
    };
    let provider: Arc<dyn DataProvider> = Arc::new(YahooFinanceClient::new(&config.yahoo)?);

    info!(
        "Scanning up to {} symbols via {} ({} concurrent, {:?} spacing)",
        config.symbol_limit,
        provider.name(),
        config.max_concurrency,
        config.request_spacing
    );

    let orchestrator = ScanOrchestrator::new(provider, universe, &config);
    let scanners: Vec<Box<dyn Scanner>> = kinds
        .into_iter()
        .map(|kind| build_scanner(kind, &config.scanners))
        .collect();

    for report in orchestrator.run_all(&scanners).await {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
