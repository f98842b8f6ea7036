//! Services for deriving, aggregating and summarizing order lines

pub mod aggregator;
pub mod binning;
pub mod config;
pub mod deriver;
pub mod logging;
pub mod stats;
pub mod ticks;

pub use aggregator::Aggregator;
pub use binning::{bin_values, drop_below, Bin, BinCount};
pub use config::Config;
pub use deriver::Deriver;
pub use logging::init_logging;
pub use stats::{FrequencySummary, SpendingSummary};
