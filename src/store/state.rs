use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{persist, Storage};
use crate::error::{AppError, Result};
use crate::models::{Message, ScrapeState};

/// Scrape results and the used-ID history.
///
/// Every mutation is staged on a copy and only becomes visible once the copy
/// has been written, so memory never runs ahead of what is on disk.
pub struct StateStore {
    state: Mutex<ScrapeState>,
    storage: Arc<dyn Storage<ScrapeState>>,
}

impl StateStore {
    pub fn load(storage: Box<dyn Storage<ScrapeState>>) -> Result<Self> {
        let state = storage.load()?.unwrap_or_default();
        tracing::debug!(
            "Loaded scrape state from {} ({} candidates, {} used)",
            storage.location(),
            state.messages.len(),
            state.messages_used.len()
        );

        Ok(Self {
            state: Mutex::new(state),
            storage: Arc::from(storage),
        })
    }

    pub async fn snapshot(&self) -> ScrapeState {
        self.state.lock().await.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.lock().await.messages.clone()
    }

    pub async fn last_scrape(&self) -> DateTime<Utc> {
        self.state.lock().await.last_scrape
    }

    pub async fn used_ids(&self) -> HashSet<u64> {
        self.state.lock().await.used_ids()
    }

    /// Merges a completed scrape and persists the result. Returns the number of
    /// candidates now held.
    pub async fn commit(
        &self,
        earliest_id: u64,
        messages: Vec<Message>,
        scraped_at: DateTime<Utc>,
    ) -> Result<usize> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        next.apply_scrape(earliest_id, messages, scraped_at);
        *state = persist(&self.storage, next).await?;
        Ok(state.messages.len())
    }

    /// Removes the candidate `id`, marks it used and persists the change.
    pub async fn take(&self, id: u64) -> Result<Message> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let message = next.take(id).ok_or(AppError::NotFound(id))?;
        *state = persist(&self.storage, next).await?;
        Ok(message)
    }
}
