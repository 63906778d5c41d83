//! Attaches a video link and thumbnail to each recommended song.
//!
//! Enrichment never fails. Missing credentials, transport errors, timeouts and
//! empty result sets all degrade to the sentinel link and the placeholder
//! thumbnail.

use super::search::{SearchError, VideoItem, VideoSearch};
use crate::recommend::models::{
    EnrichedSong, SongCandidate, DEFAULT_THUMBNAIL_PATH, NO_LINK_SENTINEL,
};
use crate::server::metrics::record_video_search;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

const LINK_RESULTS_PER_QUERY: u32 = 5;
const THUMBNAIL_RESULTS: u32 = 1;

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Query variants for the link search, most specific first.
pub fn link_queries(song: &SongCandidate) -> [String; 4] {
    let (artist, title) = (&song.artist, &song.title);
    [
        format!("{} {} official mv", artist, title),
        format!("{} {} official music video", artist, title),
        format!("{} {}", artist, title),
        format!("{} {}", title, artist),
    ]
}

fn thumbnail_query(song: &SongCandidate) -> String {
    format!("{} {} official mv", song.artist, song.title)
}

/// The first item mentioning the song title or the artist in its title or
/// description, otherwise the first item.
pub fn select_best<'a>(items: &'a [VideoItem], song: &SongCandidate) -> Option<&'a VideoItem> {
    let title = song.title.to_lowercase();
    let artist = song.artist.to_lowercase();
    items
        .iter()
        .find(|item| {
            let fields = [item.title.to_lowercase(), item.description.to_lowercase()];
            fields
                .iter()
                .any(|field| field.contains(&title) || field.contains(&artist))
        })
        .or_else(|| items.first())
}

pub struct VideoEnricher {
    search: Option<Arc<dyn VideoSearch>>,
    call_timeout: Duration,
    placeholder_thumbnail: String,
}

impl VideoEnricher {
    pub fn new(search: Option<Arc<dyn VideoSearch>>) -> Self {
        Self {
            search,
            call_timeout: DEFAULT_SEARCH_TIMEOUT,
            placeholder_thumbnail: DEFAULT_THUMBNAIL_PATH.to_string(),
        }
    }

    /// An enricher that always yields sentinel values.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_placeholder_thumbnail(mut self, path: impl Into<String>) -> Self {
        self.placeholder_thumbnail = path.into();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.search.is_some()
    }

    async fn timed_search(
        &self,
        search: &dyn VideoSearch,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<VideoItem>, SearchError> {
        let start = Instant::now();
        let call = search.search(query, max_results);
        let result = match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout),
        };
        let outcome = match &result {
            Ok(items) if items.is_empty() => "empty",
            Ok(_) => "hit",
            Err(SearchError::Timeout) => "timeout",
            Err(_) => "error",
        };
        record_video_search(outcome, start.elapsed());
        result
    }

    /// Watch URL of the best match, trying each query variant in turn.
    ///
    /// Stops at the first variant with any result. A failed request aborts
    /// the remaining variants.
    pub async fn find_link(&self, song: &SongCandidate) -> Option<String> {
        let search = self.search.as_deref()?;
        for query in link_queries(song) {
            match self.timed_search(search, &query, LINK_RESULTS_PER_QUERY).await {
                Ok(items) => {
                    if let Some(item) = select_best(&items, song) {
                        debug!("Link for {:?} found with query {:?}", song.title, query);
                        return Some(watch_url(&item.video_id));
                    }
                }
                Err(e) => {
                    warn!("Video link search failed for {:?}: {}", query, e);
                    return None;
                }
            }
        }
        debug!("No video found for {} - {}", song.artist, song.title);
        None
    }

    /// High resolution thumbnail of the top result, if any.
    pub async fn thumbnail(&self, song: &SongCandidate) -> Option<String> {
        let search = self.search.as_deref()?;
        let query = thumbnail_query(song);
        match self.timed_search(search, &query, THUMBNAIL_RESULTS).await {
            Ok(items) => items.into_iter().next()?.high_thumbnail_url,
            Err(e) => {
                warn!("Thumbnail search failed for {:?}: {}", query, e);
                None
            }
        }
    }

    pub async fn enrich(&self, song: SongCandidate) -> EnrichedSong {
        let (link, thumbnail) = tokio::join!(self.find_link(&song), self.thumbnail(&song));
        EnrichedSong {
            title: song.title,
            artist: song.artist,
            youtube_link: link.unwrap_or_else(|| NO_LINK_SENTINEL.to_string()),
            thumbnail: thumbnail.unwrap_or_else(|| self.placeholder_thumbnail.clone()),
        }
    }

    /// Enriches all songs concurrently. Output order equals input order.
    pub async fn enrich_all(&self, songs: Vec<SongCandidate>) -> Vec<EnrichedSong> {
        join_all(songs.into_iter().map(|song| self.enrich(song))).await
    }
}
