//! Best-effort image lookup against the Wikipedia search API.
//!
//! Two sequential calls per lookup: a full-text search for candidate pages,
//! then a page-image call for the first candidate that passes the relevance
//! heuristic. Every failure along the way flattens to "no image found".

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::PlannerError;
use crate::Result;

/// Candidate results requested per search
const SEARCH_LIMIT: u32 = 3;

/// Requested thumbnail width in pixels
const THUMB_WIDTH: u32 = 600;

/// Best-effort resolver from item name to image URL
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Resolve an image for the named item, never propagating failures
    async fn resolve(&self, name: &str, city: Option<&str>) -> Option<String>;
}

/// Wikipedia API client
pub struct WikiImageClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    pageid: u64,
    title: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct PageImageResponse {
    query: Option<PageImageQuery>,
}

#[derive(Debug, Deserialize)]
struct PageImageQuery {
    #[serde(default)]
    pages: HashMap<String, PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

impl WikiImageClient {
    /// Create a new client
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .user_agent(concat!("TripCraft/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.wiki_base_url.clone(),
        }
    }

    async fn try_resolve(&self, name: &str, city: Option<&str>) -> Result<Option<String>> {
        let query = search_query(name, city);
        debug!("Searching Wikipedia for {query:?}");

        let limit = SEARCH_LIMIT.to_string();
        let response: SearchResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("list", "search"),
                ("srsearch", query.as_str()),
                ("srlimit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PlannerError::image_lookup(format!("Search request failed: {e}")))?
            .json()
            .await
            .map_err(|e| PlannerError::image_lookup(format!("Search response invalid: {e}")))?;

        let hits = response.query.map(|q| q.search).unwrap_or_default();
        let words = significant_words(name);

        for hit in hits {
            if !candidate_matches(&hit, &words, city) {
                debug!("Skipping irrelevant candidate {:?}", hit.title);
                continue;
            }
            if let Some(url) = self.page_image(hit.pageid).await? {
                return Ok(Some(url));
            }
        }

        Ok(None)
    }

    async fn page_image(&self, page_id: u64) -> Result<Option<String>> {
        let page_id = page_id.to_string();
        let width = THUMB_WIDTH.to_string();
        let response: PageImageResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "pageimages"),
                ("pageids", page_id.as_str()),
                ("pithumbsize", width.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PlannerError::image_lookup(format!("Image request failed: {e}")))?
            .json()
            .await
            .map_err(|e| PlannerError::image_lookup(format!("Image response invalid: {e}")))?;

        Ok(response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .and_then(|(_, page)| page.thumbnail)
            .map(|t| t.source))
    }
}

#[async_trait]
impl ImageSource for WikiImageClient {
    async fn resolve(&self, name: &str, city: Option<&str>) -> Option<String> {
        match self.try_resolve(name, city).await {
            Ok(url) => url,
            Err(e) => {
                warn!("Image lookup for {name:?} failed: {e}");
                None
            }
        }
    }
}

/// Search text for an item, skipping the city when the name already names it
fn search_query(name: &str, city: Option<&str>) -> String {
    match city {
        Some(city) if !name.to_lowercase().contains(&city.to_lowercase()) => {
            format!("{name} {city}")
        }
        _ => name.to_string(),
    }
}

// Words too generic to indicate a match on their own.
const GENERIC_TERMS: &[&str] = &[
    "hotel",
    "restaurant",
    "stay",
    "resort",
    "inn",
    "cafe",
    "café",
    "bar",
    "the",
    "and",
    "for",
    "near",
    "house",
    "grand",
];

/// Words of the item name that actually identify it
fn significant_words(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| w.len() > 2 && !GENERIC_TERMS.contains(&w.as_str()))
        .collect()
}

/// A candidate is relevant when a significant word occurs in its title, or
/// the city occurs in its title or snippet
fn candidate_matches(hit: &SearchHit, words: &[String], city: Option<&str>) -> bool {
    let title = hit.title.to_lowercase();
    if words.iter().any(|w| title.contains(w.as_str())) {
        return true;
    }

    if let Some(city) = city {
        let city = city.to_lowercase();
        if !city.is_empty() {
            return title.contains(&city) || hit.snippet.to_lowercase().contains(&city);
        }
    }

    false
}
