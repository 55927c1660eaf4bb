use std::sync::Arc;

use tokio::sync::Mutex;

use super::{persist, Storage};
use crate::error::Result;
use crate::models::Settings;

/// Polling configuration, replaced wholesale and rewritten on every replace.
pub struct SettingsStore {
    settings: Mutex<Settings>,
    storage: Arc<dyn Storage<Settings>>,
}

impl SettingsStore {
    /// Loads the stored settings, falling back to defaults when none exist yet.
    pub fn load(storage: Box<dyn Storage<Settings>>) -> Result<Self> {
        let settings = match storage.load()? {
            Some(settings) => {
                settings.validate()?;
                settings
            }
            None => {
                tracing::info!("No settings at {}, using defaults", storage.location());
                Settings::default()
            }
        };

        Ok(Self {
            settings: Mutex::new(settings),
            storage: Arc::from(storage),
        })
    }

    pub async fn get(&self) -> Settings {
        self.settings.lock().await.clone()
    }

    /// Validates and persists `settings`, then makes them current. On failure
    /// the previous settings stay in effect.
    pub async fn replace(&self, settings: Settings) -> Result<()> {
        settings.validate()?;
        let mut current = self.settings.lock().await;
        *current = persist(&self.storage, settings).await?;
        Ok(())
    }
}
