mod config;
mod db;
mod fields;
mod models;
mod scrapers;

use clap::Parser;
use config::Config;
use db::Store;
use scrapers::{ChromeSession, OlxScraper};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::parse();

    if let Some(dir) = config.db.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let store = Store::new(&config.db);
    store.init_schema()?;

    let session = ChromeSession::launch()?;
    let page = session.open_page()?;

    let scraper = OlxScraper::new(&page, store, &config);
    let report = scraper.run()?;

    info!(
        "Run finished: {} urls found, {} persisted, {} already stored, {} failed",
        report.urls_found, report.persisted, report.skipped_existing, report.failed
    );

    let json = serde_json::to_string_pretty(&report)?;
    tokio::fs::write(&config.report, json).await?;
    info!("Saved run report to {}", config.report.display());

    Ok(())
}
