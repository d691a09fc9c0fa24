use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// OLX listing harvester: walks one list page, extracts ad fields from each
/// rendered listing page, and stores every listing exactly once.
#[derive(Debug, Parser)]
#[command(name = "listing-scout")]
pub struct Config {
    /// List page to enumerate candidate ads from
    #[arg(long, default_value = "https://www.olx.ua/uk/list/")]
    pub index_url: String,

    /// Max ads to take from the list page
    #[arg(short = 'n', long, default_value_t = 5)]
    pub limit: usize,

    /// SQLite database path
    #[arg(long, default_value = "data/listings.sqlite")]
    pub db: PathBuf,

    /// Seconds to wait for a field's element to appear on the page
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,

    /// Where to write the JSON run report
    #[arg(long, default_value = "run_report.json")]
    pub report: PathBuf,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
