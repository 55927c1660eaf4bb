use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use super::page::{absolute_url, PageKind, PageScan, PageScanner, ScanCriteria};
use crate::error::Result;
use crate::models::{Message, Settings};
use crate::source::DocumentSource;

/// Aggregate of every page visited by one scrape, oldest page first.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Smallest non-zero page earliest ID; zero when no page had messages.
    /// With the oldest page first this is that page's earliest ID.
    pub earliest_id: u64,
    pub messages: Vec<Message>,
    pub pages: usize,
}

impl WalkOutcome {
    fn absorb(&mut self, page: PageScan) -> Option<String> {
        self.pages += 1;
        if page.earliest_id != 0 && (self.earliest_id == 0 || page.earliest_id < self.earliest_id)
        {
            self.earliest_id = page.earliest_id;
        }
        self.messages.extend(page.messages);
        page.previous_link
    }
}

/// Follows the previous-page chain from the room's transcript root.
pub struct PaginationWalker {
    source: Arc<dyn DocumentSource>,
    scanner: PageScanner,
    max_pages: usize,
}

impl PaginationWalker {
    pub fn new(source: Arc<dyn DocumentSource>, max_pages: usize) -> Result<Self> {
        Ok(Self {
            source,
            scanner: PageScanner::new()?,
            max_pages: max_pages.max(1),
        })
    }

    /// Any failed fetch aborts the whole walk; nothing partial is returned.
    pub async fn walk(&self, settings: &Settings, used: HashSet<u64>) -> Result<WalkOutcome> {
        let criteria = ScanCriteria::new(settings, used);
        let root_url = settings.transcript_url();

        debug!("Fetching {}", root_url);
        let html = self.source.fetch(&root_url).await?;
        let mut outcome = WalkOutcome::default();
        let mut root = self.scanner.scan(&html, PageKind::Root, &criteria);
        // The root is the newest page, so its messages go after the older ones.
        let root_messages = std::mem::take(&mut root.messages);
        let mut next = outcome.absorb(root);
        let mut visited = HashSet::from([root_url]);

        while let Some(path) = next {
            if outcome.pages >= self.max_pages {
                warn!(
                    "Stopping after {} pages; {} was not visited",
                    outcome.pages, path
                );
                break;
            }
            let url = absolute_url(&criteria.poll_url, &path);
            if !visited.insert(url.clone()) {
                warn!("Pagination loops back to {}, stopping", url);
                break;
            }

            debug!("Fetching {}", url);
            let html = self.source.fetch(&url).await?;
            next = outcome.absorb(self.scanner.scan(&html, PageKind::Previous, &criteria));
        }

        outcome.messages.extend(root_messages);
        Ok(outcome)
    }
}
