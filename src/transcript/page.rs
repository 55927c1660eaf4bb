use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Message, Settings};

/// What a scan selects, captured once per scrape.
#[derive(Debug, Clone)]
pub struct ScanCriteria {
    pub poll_url: String,
    pub min_stars: u32,
    pub matching_words: Vec<String>,
    pub used: HashSet<u64>,
}

impl ScanCriteria {
    pub fn new(settings: &Settings, used: HashSet<u64>) -> Self {
        Self {
            poll_url: settings.poll_url.clone(),
            min_stars: settings.min_stars,
            matching_words: settings.matching_words.clone(),
            used,
        }
    }

    fn selects(&self, body: &str, stars: u32) -> bool {
        contains_any(body, &self.matching_words, false) || stars >= self.min_stars
    }
}

/// Which pager rule finds the next page to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// The room's landing transcript page.
    Root,
    /// A page reached by following a previous-page link.
    Previous,
}

#[derive(Debug, Default)]
pub struct PageScan {
    /// ID of the first message block on the page; zero when there is none.
    pub earliest_id: u64,
    pub messages: Vec<Message>,
    pub previous_link: Option<String>,
}

pub struct PageScanner {
    block: Selector,
    anchor: Selector,
    content: Selector,
    stars: Selector,
    monologue: Selector,
    username: Selector,
    rel_prev: Selector,
    pager_current: Selector,
}

impl PageScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            block: selector(".message")?,
            anchor: selector("a[name]")?,
            content: selector(".content")?,
            stars: selector(".stars .times")?,
            monologue: selector(".monologue")?,
            username: selector(".signature .username")?,
            rel_prev: selector("a[rel=\"prev\"]")?,
            pager_current: selector(".pager .current")?,
        })
    }

    pub fn scan(&self, html: &str, kind: PageKind, criteria: &ScanCriteria) -> PageScan {
        let document = Html::parse_document(html);
        let mut scan = PageScan::default();

        for block in document.select(&self.block) {
            let Some(anchor) = block.select(&self.anchor).next() else {
                continue;
            };
            let Some(id) = parse_id(anchor.value().attr("name")) else {
                continue;
            };
            if scan.earliest_id == 0 {
                scan.earliest_id = id;
            }

            let body = inner_text(block, &self.content);
            let stars: u32 = block
                .select(&self.stars)
                .next()
                .and_then(|times| element_text(times).parse().ok())
                .unwrap_or(0);

            if !criteria.selects(&body, stars) || criteria.used.contains(&id) {
                continue;
            }

            scan.messages.push(Message {
                id,
                url: absolute_url(&criteria.poll_url, anchor.value().attr("href").unwrap_or("")),
                body,
                author: self.author_of(block),
                stars,
            });
        }

        scan.previous_link = match kind {
            PageKind::Root => self.root_previous_link(&document),
            PageKind::Previous => self.next_previous_link(&document),
        };
        scan
    }

    /// Display name from the signature of the enclosing monologue; empty when
    /// that monologue is unsigned.
    fn author_of(&self, block: ElementRef) -> String {
        block
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| self.monologue.matches(ancestor))
            .and_then(|monologue| monologue.select(&self.username).next())
            .map(element_text)
            .unwrap_or_default()
    }

    fn root_previous_link(&self, document: &Html) -> Option<String> {
        document.select(&self.rel_prev).next().and_then(href)
    }

    /// The link right after the pager's current marker, or failing that the
    /// link right after the previous-page link.
    fn next_previous_link(&self, document: &Html) -> Option<String> {
        let mut candidates = anchors_after(document, &self.pager_current);
        if candidates.is_empty() {
            candidates = anchors_after(document, &self.rel_prev);
        }
        candidates.into_iter().next().and_then(href)
    }
}

/// True when `text` contains any non-blank term.
pub fn contains_any(text: &str, terms: &[String], case_sensitive: bool) -> bool {
    let mut terms = terms.iter().filter(|t| !t.trim().is_empty());
    if case_sensitive {
        terms.any(|t| text.contains(t.as_str()))
    } else {
        let text = text.to_lowercase();
        terms.any(|t| text.contains(&t.to_lowercase()))
    }
}

/// Resolves a transcript link against the poll base address.
pub fn absolute_url(base: &str, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    let base = base.trim_end_matches('/');
    if href.is_empty() || href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::Selector(format!("{}: {:?}", css, e)))
}

fn parse_id(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|&id| id > 0)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn inner_text(block: ElementRef, selector: &Selector) -> String {
    block
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn anchors_after<'a>(document: &'a Html, marker: &Selector) -> Vec<ElementRef<'a>> {
    document.select(marker).filter_map(next_anchor).collect()
}

fn next_anchor(element: ElementRef) -> Option<ElementRef> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()
        .filter(|sibling| sibling.value().name() == "a")
}

fn href(anchor: ElementRef) -> Option<String> {
    anchor
        .value()
        .attr("href")
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}
