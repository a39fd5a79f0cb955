use std::{cell::RefCell, collections::HashMap};

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use super::send_json;
use crate::error::FetchError;

/// Looks up a short encyclopedia summary by article title.
pub trait SummaryLookup {
    /// `Ok(None)` when no article exists for `title`.
    fn summary(&self, title: &str) -> Result<Option<String>, FetchError>;
}

/// Introductory plain-text extracts from the MediaWiki action API.
pub struct WikipediaClient {
    http: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: HashMap<String, PageDoc>,
}

#[derive(Debug, Deserialize)]
struct PageDoc {
    missing: Option<Value>,
    invalid: Option<Value>,
    extract: Option<String>,
}

impl WikipediaClient {
    /// Client for `endpoint`, e.g. `https://en.wikipedia.org/w/api.php`.
    pub fn new(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

impl SummaryLookup for WikipediaClient {
    fn summary(&self, title: &str) -> Result<Option<String>, FetchError> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let request = self.http.get(&self.endpoint).query(&[
            ("action", "query"),
            ("format", "json"),
            ("prop", "extracts"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("titles", title),
        ]);
        let response: QueryResponse = send_json(&self.endpoint, request)?;
        Ok(extract_summary(response))
    }
}

fn extract_summary(response: QueryResponse) -> Option<String> {
    let page = response.query?.pages.into_values().next()?;
    if page.missing.is_some() || page.invalid.is_some() {
        return None;
    }
    Some(page.extract.unwrap_or_default())
}

/// Text up to the first `.`, with the `.` re-appended.
///
/// Mirrors a plain split on `.`, so abbreviations like "Dr." end the sentence early.
pub fn first_sentence(summary: &str) -> String {
    let head = summary.split('.').next().unwrap_or_default();
    format!("{head}.")
}

/// Memoizes successful lookups by exact title for the lifetime of the value.
pub struct CachedLookup<L> {
    inner: L,
    cache: RefCell<HashMap<String, Option<String>>>,
}

impl<L: SummaryLookup> CachedLookup<L> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }
}

impl<L: SummaryLookup> SummaryLookup for CachedLookup<L> {
    fn summary(&self, title: &str) -> Result<Option<String>, FetchError> {
        if let Some(cached) = self.cache.borrow().get(title) {
            return Ok(cached.clone());
        }
        let summary = self.inner.summary(title)?;
        self.cache
            .borrow_mut()
            .insert(title.to_string(), summary.clone());
        Ok(summary)
    }
}
