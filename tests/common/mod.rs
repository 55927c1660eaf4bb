#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use transcript_watch::source::DocumentSource;
use transcript_watch::store::Storage;
use transcript_watch::{AppError, Result, Settings};

pub const BASE: &str = "https://chat.example.com";
pub const ROOT: &str = "https://chat.example.com/transcript/7";

/// Serves pages from a map and records every URL requested.
#[derive(Default)]
pub struct FakeSource {
    pages: Mutex<HashMap<String, String>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.get_mut().unwrap().insert(url.to_string(), html);
        self
    }

    pub fn insert_page(&self, url: &str, html: String) {
        self.pages.lock().unwrap().insert(url.to_string(), html);
    }

    pub fn remove_page(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::Fetch {
                url: url.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
    }
}

/// In-memory storage that can be told to start failing writes.
pub struct MemoryStorage<T> {
    value: Arc<Mutex<Option<T>>>,
    fail_saves: Arc<AtomicBool>,
    saves: Arc<Mutex<usize>>,
}

impl<T: Clone> MemoryStorage<T> {
    pub fn new(initial: Option<T>) -> Self {
        Self {
            value: Arc::new(Mutex::new(initial)),
            fail_saves: Arc::new(AtomicBool::new(false)),
            saves: Arc::new(Mutex::new(0)),
        }
    }

    /// Second handle onto the same backing value.
    pub fn handle(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            fail_saves: Arc::clone(&self.fail_saves),
            saves: Arc::clone(&self.saves),
        }
    }

    pub fn stored(&self) -> Option<T> {
        self.value.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl<T: Clone + Send> Storage<T> for MemoryStorage<T> {
    fn load(&self) -> Result<Option<T>> {
        Ok(self.stored())
    }

    fn save(&self, value: &T) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("disk full".to_string()));
        }
        *self.value.lock().unwrap() = Some(value.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

pub fn settings(words: &[&str], min_stars: u32) -> Settings {
    Settings {
        poll_url: BASE.to_string(),
        poll_room_id: 7,
        poll_frequency: 60,
        min_stars,
        matching_words: words.iter().map(|w| w.to_string()).collect(),
    }
}

pub fn block(id: u64, author: &str, body: &str, stars: u32) -> String {
    let stars = if stars > 0 {
        format!(r#"<span class="stars vote-count-container"><span class="times">{stars}</span></span>"#)
    } else {
        String::new()
    };
    format!(
        r#"<div class="monologue"><div class="signature"><div class="username">{author}</div></div><div class="messages"><div class="message"><a name="{id}" href="/transcript/message/{id}#{id}"></a><div class="content">{body}</div>{stars}</div></div></div>"#
    )
}

/// Page whose pager marks itself current and links onward to `next`.
pub fn page(blocks: &[String], next: Option<&str>) -> String {
    let pager = match next {
        Some(href) => format!(
            r#"<div class="pager"><span class="current">1</span><a href="{href}">2</a></div>"#
        ),
        None => r#"<div class="pager"><span class="current">1</span></div>"#.to_string(),
    };
    format!("<html><body>{}{}</body></html>", blocks.concat(), pager)
}

/// Root page linking to `prev` through `rel="prev"`.
pub fn root_page(blocks: &[String], prev: Option<&str>) -> String {
    let link = prev
        .map(|href| format!(r#"<a rel="prev" href="{href}">previous day</a>"#))
        .unwrap_or_default();
    format!("<html><body>{}{}</body></html>", blocks.concat(), link)
}

pub fn ids<'a>(messages: impl IntoIterator<Item = &'a transcript_watch::Message>) -> Vec<u64> {
    messages.into_iter().map(|m| m.id).collect()
}
