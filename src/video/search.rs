use async_trait::async_trait;
use thiserror::Error;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub high_thumbnail_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Search timed out")]
    Timeout,
}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout
        } else {
            SearchError::Connection(e.to_string())
        }
    }
}

/// A video index that can be searched by free text.
///
/// Results come back in relevance order, type video only.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<VideoItem>, SearchError>;
}
