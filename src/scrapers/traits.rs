use std::time::Duration;

use anyhow::Result;

use crate::fields::Locator;

/// A located DOM node, readable as visible text or by property
pub trait PageNode {
    fn text(&self) -> Result<String>;
    fn property(&self, name: &str) -> Result<String>;
}

/// Rendered-page access used by the extractor and the listing source.
/// This is the seam between extraction logic and the browser, so other
/// engines (or a fake for tests) can be dropped in.
pub trait Page {
    fn navigate(&self, url: &str) -> Result<()>;

    /// Poll until at least one node matches `locator` or `timeout` elapses.
    /// A timeout yields an empty Vec, not an error.
    fn locate_all(&self, locator: &Locator, timeout: Duration)
        -> Result<Vec<Box<dyn PageNode + '_>>>;
}
