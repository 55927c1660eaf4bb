//! Transcript scraping: page scanning, pagination and the polling loop.

mod page;
mod scraper;
mod walker;

pub use self::page::{absolute_url, contains_any, PageKind, PageScan, PageScanner, ScanCriteria};
pub use self::scraper::Scraper;
pub use self::walker::{PaginationWalker, WalkOutcome};
