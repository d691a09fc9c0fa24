use std::ffi::OsStr;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use headless_chrome::{Browser, Element, Tab};
use serde_json::Value;
use tracing::info;

use crate::fields::Locator;
use crate::scrapers::traits::{Page, PageNode};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Headless Chrome session shared by the whole run
pub struct ChromeSession {
    browser: Browser,
}

impl ChromeSession {
    /// Launch Chrome with the flags the scraper needs inside a container
    pub fn launch() -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = headless_chrome::LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .args(vec![OsStr::new("--disable-dev-shm-usage")])
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        info!("Acquired headless browser");

        Ok(Self { browser })
    }

    pub fn open_page(&self) -> Result<ChromePage> {
        let tab = self.browser.new_tab()?;
        Ok(ChromePage { tab })
    }
}

/// One Chrome tab exposed through the `Page` capability
pub struct ChromePage {
    tab: Arc<Tab>,
}

impl ChromePage {
    fn find_once(&self, locator: &Locator) -> Result<Vec<Element<'_>>> {
        match locator {
            Locator::ClassName(class) => self.tab.find_elements(&format!(".{class}")),
            Locator::XPath(expr) => self.tab.find_elements_by_xpath(expr),
        }
    }
}

impl Page for ChromePage {
    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.tab.wait_until_navigated()?;
        Ok(())
    }

    fn locate_all(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Vec<Box<dyn PageNode + '_>>> {
        let deadline = Instant::now() + timeout;
        loop {
            // find_elements errors when nothing matches yet; keep polling either way
            if let Ok(elements) = self.find_once(locator) {
                if !elements.is_empty() {
                    return Ok(elements
                        .into_iter()
                        .map(|el| Box::new(ChromeNode { el }) as Box<dyn PageNode>)
                        .collect());
                }
            }
            if Instant::now() >= deadline {
                return Ok(Vec::new());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

struct ChromeNode<'a> {
    el: Element<'a>,
}

impl PageNode for ChromeNode<'_> {
    fn text(&self) -> Result<String> {
        self.el.get_inner_text()
    }

    fn property(&self, name: &str) -> Result<String> {
        // DOM properties (not attributes) so src/href come back resolved
        let declaration = format!(
            "function() {{ const v = this[{}]; return v == null ? '' : String(v); }}",
            serde_json::to_string(name)?
        );
        let remote = self.el.call_js_fn(&declaration, vec![], false)?;
        match remote.value {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Ok(other.to_string()),
            None => Ok(String::new()),
        }
    }
}
