use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::walker::PaginationWalker;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Message, ScrapeState, Settings};
use crate::source::{DocumentSource, HttpSource};
use crate::store::{JsonFile, SettingsStore, StateStore, Storage};

/// Regularly scrapes the room transcript for messages matching the current
/// settings and keeps them as candidates until they are used. IDs of used
/// messages are remembered so they are not offered again.
pub struct Scraper {
    shared: Arc<Shared>,
    shutdown: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    settings: SettingsStore,
    state: StateStore,
    walker: PaginationWalker,
}

impl Scraper {
    /// Loads both stores. The polling loop is not running until [`Scraper::start`].
    pub fn new(
        source: Arc<dyn DocumentSource>,
        settings: Box<dyn Storage<Settings>>,
        state: Box<dyn Storage<ScrapeState>>,
        max_pages: usize,
    ) -> Result<Self> {
        let shared = Shared {
            settings: SettingsStore::load(settings)?,
            state: StateStore::load(state)?,
            walker: PaginationWalker::new(source, max_pages)?,
        };

        Ok(Self {
            shared: Arc::new(shared),
            shutdown: CancellationToken::new(),
            task: Mutex::new(None),
        })
    }

    /// Scraper backed by HTTP and the JSON documents under `config.data_path`.
    pub fn open(config: &Config) -> Result<Self> {
        let source = Arc::new(HttpSource::new(config)?);
        Self::new(
            source,
            Box::new(JsonFile::<Settings>::new(config.settings_path())),
            Box::new(JsonFile::<ScrapeState>::new(config.state_path())),
            config.max_pages,
        )
    }

    /// Spawns the polling loop. Calling it while the loop runs does nothing;
    /// calling it after [`Scraper::close`] fails.
    pub fn start(&self) -> Result<()> {
        if self.shutdown.is_cancelled() {
            return Err(AppError::Closed);
        }
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.is_some() {
            return Ok(());
        }
        *task = Some(tokio::spawn(run(
            Arc::clone(&self.shared),
            self.shutdown.clone(),
        )));
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Signals the loop to stop and waits until it has exited. A scrape that
    /// is already running finishes first.
    pub async fn close(&self) {
        self.shutdown.cancel();
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!("Scrape loop ended abnormally: {}", e);
            }
        }
    }

    /// Runs one scrape now, outside the timer. Returns the candidate count.
    pub async fn scrape_now(&self) -> Result<usize> {
        self.shared.scrape().await
    }

    /// Current candidates, oldest discovery first.
    pub async fn messages(&self) -> Vec<Message> {
        self.shared.state.messages().await
    }

    /// Removes the candidate `id` so it is never offered again.
    pub async fn use_message(&self, id: u64) -> Result<Message> {
        let message = self.shared.state.take(id).await?;
        info!("Message {} used", id);
        Ok(message)
    }

    pub async fn state(&self) -> ScrapeState {
        self.shared.state.snapshot().await
    }

    pub async fn settings(&self) -> Settings {
        self.shared.settings.get().await
    }

    pub async fn set_settings(&self, settings: Settings) -> Result<()> {
        self.shared.settings.replace(settings).await
    }
}

impl Drop for Scraper {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl Shared {
    async fn scrape(&self) -> Result<usize> {
        let settings = self.settings.get().await;
        let used = self.state.used_ids().await;

        let outcome = self.walker.walk(&settings, used).await?;
        let pages = outcome.pages;
        let earliest_id = outcome.earliest_id;
        let count = self
            .state
            .commit(earliest_id, outcome.messages, Utc::now())
            .await?;

        info!(
            "Scraped {} pages: {} candidates, earliest id {}",
            pages, count, earliest_id
        );
        Ok(count)
    }
}

async fn run(shared: Arc<Shared>, shutdown: CancellationToken) {
    info!("Scrape loop started");

    while !shutdown.is_cancelled() {
        let interval = shared.settings.get().await.poll_interval();
        let last_scrape = shared.state.last_scrape().await;

        let wait = match (last_scrape + interval - Utc::now()).to_std() {
            Ok(remaining) if !remaining.is_zero() => remaining,
            _ => {
                if let Err(e) = shared.scrape().await {
                    warn!("Scrape failed: {}", e);
                }
                interval.to_std().unwrap_or(Duration::from_secs(60))
            }
        };

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(wait) => {}
        }
    }

    info!("Scrape loop stopped");
}
