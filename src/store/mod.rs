//! Lock-guarded, persisted records shared between the scrape loop and callers.

mod json_file;
mod settings;
mod state;

pub use json_file::JsonFile;
pub use settings::SettingsStore;
pub use state::StateStore;

use std::sync::Arc;

use crate::error::{AppError, Result};

/// Durable backing for one record.
pub trait Storage<T>: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<T>>;

    fn save(&self, value: &T) -> Result<()>;

    /// Human-readable location for log lines.
    fn location(&self) -> String;
}

/// Writes `value` on the blocking pool and hands it back once it is stored.
async fn persist<T>(storage: &Arc<dyn Storage<T>>, value: T) -> Result<T>
where
    T: Send + 'static,
{
    let storage = Arc::clone(storage);
    tokio::task::spawn_blocking(move || storage.save(&value).map(|()| value))
        .await
        .map_err(|e| AppError::Persistence(format!("write task failed: {}", e)))?
}
