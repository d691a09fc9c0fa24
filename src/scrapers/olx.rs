use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

use crate::config::Config;
use crate::db::{persist, Store};
use crate::fields::Locator;
use crate::models::RunReport;
use crate::scrapers::extract;
use crate::scrapers::traits::Page;

/// Anchor carrying each ad link on the OLX list page
const AD_LINK: Locator = Locator::XPath("//div[@data-cy='ad-card-title']/a");

/// OLX scraper: enumerates candidate ads from one index page, then extracts
/// and stores each listing not seen before.
pub struct OlxScraper<'a> {
    page: &'a dyn Page,
    store: Store,
    config: &'a Config,
}

impl<'a> OlxScraper<'a> {
    pub fn new(page: &'a dyn Page, store: Store, config: &'a Config) -> Self {
        Self { page, store, config }
    }

    /// Read up to `limit` candidate ad URLs off the index page, in page order
    pub fn list_candidate_urls(&self) -> Result<Vec<String>> {
        self.page
            .navigate(&self.config.index_url)
            .context("Failed to open the list page")?;

        let nodes = self.page.locate_all(&AD_LINK, self.config.timeout())?;
        let mut urls = Vec::new();
        for node in nodes.iter().take(self.config.limit) {
            urls.push(node.property("href")?);
        }

        info!("Got the following urls:\n{}", urls.join("\n"));
        Ok(urls)
    }

    /// Process every candidate URL in order: dedup gate, then extract and
    /// persist. One listing's failure never stops the rest.
    pub fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let urls = self.list_candidate_urls()?;
        let mut report = RunReport::new(started_at, urls.len());

        for url in &urls {
            if self.store.listing_exists(url) {
                info!("Listing {} is already stored, skipping", url);
                report.skipped_existing += 1;
                continue;
            }
            match self.harvest(url) {
                Ok(()) => report.persisted += 1,
                Err(e) => {
                    error!("Failed to process listing {}: {:#}", url, e);
                    report.failed += 1;
                }
            }
        }

        report.finished_at = Utc::now();
        Ok(report)
    }

    fn harvest(&self, url: &str) -> Result<()> {
        self.page
            .navigate(url)
            .context("Failed to open the listing page")?;
        info!("Located listing with url {}, getting field values...", url);

        let record = extract::assemble(self.page, url, self.config.timeout())?;
        persist::persist(&self.store, &record);
        Ok(())
    }
}
