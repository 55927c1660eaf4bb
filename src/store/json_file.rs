use std::marker::PhantomData;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Storage;
use crate::error::{AppError, Result};

/// A record kept as a pretty-printed JSON document on disk.
pub struct JsonFile<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    fn persistence_error(&self, err: impl std::fmt::Display) -> AppError {
        AppError::Persistence(format!("{}: {}", self.path.display(), err))
    }
}

impl<T> Storage<T> for JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let value = serde_json::from_str(&content)?;
        Ok(Some(value))
    }

    fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.persistence_error(e))?;
        }
        let content =
            serde_json::to_string_pretty(value).map_err(|e| self.persistence_error(e))?;

        // Write beside the target and rename so readers never see a partial file.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| self.persistence_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.persistence_error(e))?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Settings;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let file: JsonFile<Settings> = JsonFile::new(dir.path().join("absent.json"));

        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn save_creates_parent_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("settings.json");
        let file: JsonFile<Settings> = JsonFile::new(&path);
        let settings = Settings {
            matching_words: vec!["ubuntu".to_string()],
            ..Settings::default()
        };

        file.save(&settings).unwrap();

        assert_eq!(file.load().unwrap(), Some(settings));
        assert!(!path.with_extension("json.tmp").exists());
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"MatchingWords\""));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ \"PollURL\": 12").unwrap();
        let file: JsonFile<Settings> = JsonFile::new(&path);

        assert!(matches!(file.load(), Err(AppError::Json(_))));
    }

    #[test]
    fn unwritable_target_is_a_persistence_error() {
        let dir = TempDir::new().unwrap();
        // The parent "directory" is a regular file, so the write cannot succeed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let file: JsonFile<Settings> = JsonFile::new(blocker.join("settings.json"));

        assert!(matches!(
            file.save(&Settings::default()),
            Err(AppError::Persistence(_))
        ));
    }
}
