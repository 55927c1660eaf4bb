use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "PollURL")]
    pub poll_url: String,
    #[serde(rename = "PollRoomID")]
    pub poll_room_id: u64,
    /// Minutes between scrapes.
    #[serde(rename = "PollFrequency")]
    pub poll_frequency: u32,
    #[serde(rename = "MinStars")]
    pub min_stars: u32,
    #[serde(rename = "MatchingWords", default)]
    pub matching_words: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_url: "https://chat.stackexchange.com".to_string(),
            poll_room_id: 201,
            poll_frequency: 60,
            min_stars: 4,
            matching_words: Vec::new(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.poll_frequency == 0 {
            return Err(AppError::InvalidSettings(
                "PollFrequency must be at least one minute".to_string(),
            ));
        }
        Url::parse(&self.poll_url).map_err(|e| {
            AppError::InvalidSettings(format!("PollURL {:?}: {}", self.poll_url, e))
        })?;
        Ok(())
    }

    /// Root transcript page for the configured room.
    pub fn transcript_url(&self) -> String {
        format!(
            "{}/transcript/{}",
            self.poll_url.trim_end_matches('/'),
            self.poll_room_id
        )
    }

    pub fn poll_interval(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.poll_frequency.max(1)))
    }
}
