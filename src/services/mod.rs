pub mod aggregate;
pub mod cache;
pub mod indicators;
pub mod levels;
pub mod orchestrator;
pub mod ranges;
pub mod scanners;

pub use aggregate::resample;
pub use cache::{SeriesCache, SeriesKey};
pub use levels::{identify_levels, local_extrema, LevelConfig};
pub use orchestrator::{ScanOrchestrator, SymbolOutcome};
pub use ranges::{detect_ranges, RangeConfig};
pub use scanners::{build_scanner, Scanner};
