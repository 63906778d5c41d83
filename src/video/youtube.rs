//! YouTube Data API v3 search client.

use super::search::{SearchError, VideoItem, VideoSearch};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTubeSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchResult>>,
}

#[derive(Deserialize)]
struct SearchResult {
    id: Option<ResultId>,
    snippet: Option<Snippet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultId {
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl SearchResult {
    /// Channel and playlist hits carry no video id and are skipped.
    fn into_item(self) -> Option<VideoItem> {
        let video_id = self.id?.video_id.filter(|id| !id.is_empty())?;
        let snippet = self.snippet;
        let (title, description, high_thumbnail_url) = match snippet {
            Some(s) => (
                s.title.unwrap_or_default(),
                s.description.unwrap_or_default(),
                s.thumbnails.and_then(|t| t.high).and_then(|h| h.url),
            ),
            None => (String::new(), String::new(), None),
        };
        Some(VideoItem {
            video_id,
            title,
            description,
            high_thumbnail_url,
        })
    }
}

impl YouTubeSearchClient {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self> {
        Self::with_base_url(YOUTUBE_API_BASE, api_key, timeout)
    }

    pub fn with_base_url(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearchClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<VideoItem>, SearchError> {
        let url = format!("{}/search", self.base_url);
        let max_results = max_results.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("order", "relevance"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        let items: Vec<VideoItem> = body
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(SearchResult::into_item)
            .collect();

        debug!("YouTube search {:?} returned {} items", query, items.len());
        Ok(items)
    }
}
