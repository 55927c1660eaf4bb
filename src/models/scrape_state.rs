use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Message;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeState {
    #[serde(rename = "LastScrape")]
    pub last_scrape: DateTime<Utc>,
    /// Low-water mark: nothing below this ID was seen by the last scrape.
    #[serde(rename = "EarliestID")]
    pub earliest_id: u64,
    #[serde(rename = "Messages", default)]
    pub messages: Vec<Message>,
    #[serde(rename = "MessagesUsed", default)]
    pub messages_used: Vec<u64>,
}

impl ScrapeState {
    /// Replaces the candidates with a fresh scrape result and prunes the used
    /// list below the new low-water mark.
    pub fn apply_scrape(
        &mut self,
        earliest_id: u64,
        messages: Vec<Message>,
        scraped_at: DateTime<Utc>,
    ) {
        let used: HashSet<u64> = self.messages_used.iter().copied().collect();
        let mut seen = HashSet::new();

        self.last_scrape = scraped_at;
        self.earliest_id = earliest_id;
        self.messages = messages
            .into_iter()
            .filter(|m| !used.contains(&m.id) && seen.insert(m.id))
            .collect();
        self.messages_used.retain(|&id| id >= earliest_id);
    }

    /// Removes the candidate with `id` and records it as used.
    pub fn take(&mut self, id: u64) -> Option<Message> {
        let index = self.messages.iter().position(|m| m.id == id)?;
        let message = self.messages.remove(index);
        if !self.messages_used.contains(&id) {
            self.messages_used.push(id);
        }
        Some(message)
    }

    pub fn used_ids(&self) -> HashSet<u64> {
        self.messages_used.iter().copied().collect()
    }
}
