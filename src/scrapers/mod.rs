pub mod browser;
pub mod extract;
pub mod olx;
pub mod traits;

pub use browser::ChromeSession;
pub use olx::OlxScraper;
